//! The periodic decision loop.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{interval, MissedTickBehavior};

use crate::agent::Agent;
use crate::error::AgentError;

/// One step of the decision loop.
pub trait Decide {
    /// Makes and records one decision, returning the new event's hash.
    fn decide(&mut self) -> impl Future<Output = Result<String, AgentError>>;
}

impl Decide for Agent {
    async fn decide(&mut self) -> Result<String, AgentError> {
        self.make_decision().await
    }
}

/// Outcome counts for one run of [`run_decision_loop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionLoopReport {
    pub succeeded: u64,
    pub failed: u64,
}

/// Calls [`Decide::decide`] (for an [`Agent`], [`Agent::make_decision`])
/// once per `period` until `shutdown` resolves.
///
/// The first decision happens one full period after the call. Failed
/// decisions are logged and the loop keeps going. A decision still waiting
/// on the model when `shutdown` resolves is dropped.
pub async fn run_decision_loop<D, F>(
    decider: &mut D,
    period: Duration,
    shutdown: F,
) -> DecisionLoopReport
where
    D: Decide,
    F: Future<Output = ()>,
{
    let mut report = DecisionLoopReport::default();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    tokio::pin!(shutdown);

    tracing::info!(interval_ms = period.as_millis() as u64, "starting decision loop");

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            () = &mut shutdown => {
                tracing::info!("shutdown requested during decision, abandoning it");
                break;
            }
            res = decider.decide() => match res {
                Ok(hash) => {
                    report.succeeded += 1;
                    tracing::debug!(hash = %hash, "decision recorded");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(error = %e, "decision error");
                }
            },
        }
    }

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "decision loop stopped"
    );
    report
}
