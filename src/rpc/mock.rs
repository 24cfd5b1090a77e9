//! Scripted transport for tests

use super::{Transport, TransportError};
use crate::config::TransportConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A call as the transport saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub method: String,
    pub params: Vec<Value>,
}

/// Replays queued results in order and records every call
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Value, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, result: Value) -> Self {
        self.replies.lock().unwrap().push_back(Ok(result));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(
        &self,
        config: &TransportConfig,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: config.url().to_string(),
            method: method.to_string(),
            params,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Status {
                    status: 503,
                    body: format!("no scripted reply for {}", method),
                })
            })
    }
}
