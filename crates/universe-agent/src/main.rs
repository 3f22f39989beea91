//! Blockchain Universe agent binary.
//!
//! Loads configuration, starts one agent on a shared in-memory ledger, and
//! runs its decision loop until SIGTERM/SIGINT.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use universe_agent::config::{self, example_config};
use universe_agent::{run_decision_loop, Agent};
use universe_ledger::EventStore;
use universe_llm::LlmClient;

const EXAMPLE_CONFIG_FLAG: &str = "--example-config";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Where the configuration path was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    Argument,
    Environment,
    Default,
}

impl ConfigSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Argument => "argument",
            Self::Environment => "UNIVERSE_CONFIG_PATH",
            Self::Default => "default",
        }
    }
}

/// Picks the first non-blank of the command-line argument and the
/// environment value, falling back to `config.toml`.
fn config_path(arg: Option<String>, env: Option<String>) -> (String, ConfigSource) {
    let present = |value: &String| !value.trim().is_empty();
    match (arg.filter(present), env.filter(present)) {
        (Some(path), _) => (path, ConfigSource::Argument),
        (None, Some(path)) => (path, ConfigSource::Environment),
        (None, None) => (DEFAULT_CONFIG_PATH.to_string(), ConfigSource::Default),
    }
}

#[tokio::main]
async fn main() {
    if std::env::args().nth(1).as_deref() == Some(EXAMPLE_CONFIG_FLAG) {
        let rendered = toml::to_string_pretty(&example_config())
            .expect("example configuration must serialize");
        print!("{rendered}");
        return;
    }

    let (path, source) = config_path(
        std::env::args().nth(1),
        std::env::var("UNIVERSE_CONFIG_PATH").ok(),
    );
    let config = config::load_config(Some(&path))
        .expect("failed to load configuration; the agent cannot start without an LLM endpoint");

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(path = %path, source = source.as_str(), "configuration loaded");

    let ledger = Arc::new(EventStore::with_parent_policy(config.ledger.parent_policy));
    let llm = LlmClient::new(config.llm.clone()).expect("failed to initialize LLM client");

    if let Err(e) = llm.health().await {
        tracing::warn!(error = %e, endpoint = %config.llm.api_endpoint, "LLM health check failed");
    }

    let mut agent =
        Agent::new(config.agent.clone(), ledger, llm).expect("failed to initialize agent");
    tracing::info!(public_key = %agent.public_key_hex(), "agent initialized");

    if let Err(e) = agent.create_initial_event() {
        tracing::error!(error = %e, "failed to create initial event");
    }

    tracing::info!("agent running, press Ctrl+C to stop");
    let report =
        run_decision_loop(&mut agent, config.agent.decision_interval(), shutdown_signal()).await;

    let stats = agent.stats();
    tracing::info!(
        public_key = %stats.public_key,
        last_event_hash = stats.last_event_hash.as_deref().unwrap_or("<none>"),
        total_events = stats.total_events,
        known_agents = stats.known_agents,
        decisions_succeeded = report.succeeded,
        decisions_failed = report.failed,
        "agent shut down"
    );
}

/// Resolves on the first SIGINT (Ctrl+C) or SIGTERM and logs which one.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, stopping on Ctrl+C only");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::warn!(error = %e, "Ctrl+C handler failed");
            }
            "SIGINT"
        }
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "stopping decision loop");
}
