//! Decision loop scheduling and shutdown.
//!
//! Scheduling is checked on a paused clock with a scripted decider so tick
//! counts are exact; the agent itself is driven against the fake endpoint
//! with shutdown tied to observable progress rather than elapsed time.

mod common;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use common::{FakeLlm, Reply};
use tokio::time::{sleep, timeout, Instant};
use universe_agent::{run_decision_loop, AgentError, Decide, DecisionLoopReport};
use universe_ledger::EventStore;

const PERIOD: Duration = Duration::from_millis(100);

enum Step {
    Succeed,
    Fail,
    Stall(Duration),
}

/// Plays back `steps`, then succeeds forever, recording when each call
/// started.
struct Scripted {
    steps: VecDeque<Step>,
    calls: Vec<Instant>,
}

impl Scripted {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            calls: Vec::new(),
        }
    }
}

impl Decide for Scripted {
    async fn decide(&mut self) -> Result<String, AgentError> {
        self.calls.push(Instant::now());
        match self.steps.pop_front().unwrap_or(Step::Succeed) {
            Step::Succeed => Ok(format!("hash-{}", self.calls.len())),
            Step::Fail => Err(AgentError::EmptyDecision),
            Step::Stall(delay) => {
                sleep(delay).await;
                Ok("late".to_string())
            }
        }
    }
}

/// Resolves once `ledger` holds at least `count` events.
async fn ledger_reaches(ledger: Arc<EventStore>, count: usize) {
    while ledger.len() < count {
        sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn decides_once_per_period_starting_one_period_in() {
    let mut decider = Scripted::new(Vec::new());
    let start = Instant::now();

    let report = run_decision_loop(&mut decider, PERIOD, sleep(PERIOD * 4 + PERIOD / 2)).await;

    assert_eq!(
        report,
        DecisionLoopReport {
            succeeded: 4,
            failed: 0
        }
    );
    let offsets: Vec<Duration> = decider.calls.iter().map(|t| *t - start).collect();
    assert_eq!(offsets, vec![PERIOD, PERIOD * 2, PERIOD * 3, PERIOD * 4]);
}

#[tokio::test(start_paused = true)]
async fn shutdown_before_first_period_makes_no_decision() {
    let mut decider = Scripted::new(Vec::new());

    let report =
        run_decision_loop(&mut decider, Duration::from_secs(60), sleep(Duration::from_secs(59)))
            .await;

    assert_eq!(report, DecisionLoopReport::default());
    assert!(decider.calls.is_empty());
}

#[tokio::test(start_paused = true)]
async fn immediate_shutdown_returns_without_deciding() {
    let mut decider = Scripted::new(Vec::new());

    let report = run_decision_loop(&mut decider, PERIOD, std::future::ready(())).await;

    assert_eq!(report, DecisionLoopReport::default());
    assert!(decider.calls.is_empty());
}

#[tokio::test(start_paused = true)]
async fn failures_are_counted_and_the_loop_continues() {
    let mut decider = Scripted::new(vec![Step::Fail, Step::Fail, Step::Succeed]);

    let report = run_decision_loop(&mut decider, PERIOD, sleep(PERIOD * 5 + PERIOD / 2)).await;

    assert_eq!(
        report,
        DecisionLoopReport {
            succeeded: 3,
            failed: 2
        }
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_abandons_a_stalled_decision() {
    let mut decider = Scripted::new(vec![Step::Stall(Duration::from_secs(30))]);
    let start = Instant::now();

    let report = run_decision_loop(&mut decider, PERIOD, sleep(PERIOD * 3)).await;

    assert_eq!(report, DecisionLoopReport::default());
    assert_eq!(decider.calls.len(), 1);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn agent_records_chained_decisions_until_shutdown() {
    let llm = FakeLlm::start(vec![
        Reply::Text("alpha"),
        Reply::Text("beta"),
        Reply::Text("gamma"),
    ])
    .await;
    let ledger = Arc::new(EventStore::new());
    let mut agent = llm.agent(ledger.clone());
    agent.create_initial_event().unwrap();

    let report = timeout(
        Duration::from_secs(10),
        run_decision_loop(&mut agent, PERIOD, ledger_reaches(ledger.clone(), 3)),
    )
    .await
    .expect("two decisions should be recorded well within the timeout");

    assert!(report.succeeded >= 2, "{report:?}");
    assert_eq!(report.failed, 0);
    assert_eq!(ledger.len() as u64, 1 + report.succeeded);
    assert_eq!(
        agent.chain_from_last(None).len() as u64,
        1 + report.succeeded
    );
}

#[tokio::test]
async fn agent_request_in_flight_is_dropped_on_shutdown() {
    let llm = FakeLlm::start(vec![Reply::Hang(Duration::from_secs(30))]).await;
    let ledger = Arc::new(EventStore::new());
    let mut agent = llm.agent(ledger.clone());
    let genesis = agent.create_initial_event().unwrap();

    let seen = llm.clone();
    let request_arrived = async move {
        while seen.prompts().is_empty() {
            sleep(Duration::from_millis(10)).await;
        }
    };

    let report = timeout(
        Duration::from_secs(10),
        run_decision_loop(&mut agent, PERIOD, request_arrived),
    )
    .await
    .expect("loop should stop while the request is still pending");

    assert_eq!(report, DecisionLoopReport::default());
    assert_eq!(ledger.len(), 1);
    assert_eq!(agent.last_event(), Some(genesis.as_str()));
}
