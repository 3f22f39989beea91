//! Depth-bounded ancestor traversal.

use std::collections::HashSet;

use crate::event::Event;

/// Walks the parent graph depth-first from `start`, returning events in
/// visitation order (start first, then each parent's ancestry before the
/// next parent).
///
/// The start event sits at depth 0 and a branch stops expanding at depth
/// `max_depth`, so `max_depth == 0` yields nothing and `max_depth == 1`
/// yields only the start event. Hashes the lookup does not know are
/// skipped. Each hash is visited at most once, so cyclic or self-referencing
/// parent lists terminate.
pub(crate) fn walk<'a, F>(start: &str, max_depth: usize, lookup: F) -> Vec<Event>
where
    F: Fn(&str) -> Option<&'a Event>,
{
    let mut chain = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&str, usize)> = vec![(start, 0)];

    while let Some((hash, depth)) = stack.pop() {
        if depth >= max_depth || visited.contains(hash) {
            continue;
        }
        let Some(event) = lookup(hash) else {
            continue;
        };

        visited.insert(hash);
        chain.push(event.clone());

        // Reverse so the first parent is expanded first.
        for parent in event.parents.iter().rev() {
            stack.push((parent.as_str(), depth + 1));
        }
    }

    chain
}
