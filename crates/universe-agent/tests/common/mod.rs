//! Fake completion endpoint shared by the agent integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use universe_agent::config::AgentConfig;
use universe_agent::Agent;
use universe_ledger::EventStore;
use universe_llm::{LlmClient, LlmConfig};

/// One scripted answer from the fake endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(&'static str),
    Status(StatusCode),
    Hang(Duration),
}

/// Replies are consumed in order; the last one repeats once the queue runs
/// out. Every prompt received is recorded.
#[derive(Debug, Clone)]
pub struct FakeLlm {
    pub endpoint: String,
    replies: Arc<Mutex<VecDeque<Reply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeLlm {
    pub async fn start(replies: Vec<Reply>) -> Self {
        let replies = Arc::new(Mutex::new(VecDeque::from(replies)));
        let prompts = Arc::new(Mutex::new(Vec::new()));

        let queue = replies.clone();
        let seen = prompts.clone();
        let router = Router::new().route(
            "/v1/completions",
            post(move |Json(body): Json<Value>| {
                let queue = queue.clone();
                let seen = seen.clone();
                async move {
                    seen.lock()
                        .unwrap()
                        .push(body["prompt"].as_str().unwrap_or_default().to_string());
                    let reply = {
                        let mut queue = queue.lock().unwrap();
                        if queue.len() > 1 {
                            queue.pop_front().unwrap()
                        } else {
                            queue.front().cloned().unwrap_or(Reply::Text("idle"))
                        }
                    };
                    match reply {
                        Reply::Text(text) => Json(json!({
                            "choices": [{"text": text, "finish_reason": "stop"}],
                            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
                        }))
                        .into_response(),
                        Reply::Status(status) => (status, "upstream unavailable").into_response(),
                        Reply::Hang(delay) => {
                            tokio::time::sleep(delay).await;
                            Json(json!({"choices": [{"text": "too late"}]})).into_response()
                        }
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            endpoint: format!("http://{addr}/v1/completions"),
            replies,
            prompts,
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn client(&self) -> LlmClient {
        let mut config = LlmConfig::new(&self.endpoint);
        config.timeout_seconds = 5;
        LlmClient::new(config).unwrap()
    }

    pub fn agent(&self, ledger: Arc<EventStore>) -> Agent {
        Agent::new(AgentConfig::default(), ledger, self.client()).unwrap()
    }
}
