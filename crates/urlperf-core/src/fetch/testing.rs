//! Scripted transports for unit tests.

use super::{Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub(crate) enum Step {
    Respond { status_code: u16, size: u64 },
    FailWithStatus(u16),
    Unreachable,
    Hang,
}

/// Plays back a script of steps, then keeps answering 200 with 1000 bytes
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn always_ok() -> Self {
        Self::new(Vec::new())
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn perform(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        self.seen.lock().unwrap().push(url.to_string());
        let step = self.script.lock().unwrap().pop_front().unwrap_or(Step::Respond {
            status_code: 200,
            size: 1000,
        });

        match step {
            Step::Respond { status_code, size } => Ok(TransportResponse {
                status_code,
                status_text: "OK".to_string(),
                body_size_bytes: size,
            }),
            Step::FailWithStatus(status_code) => Err(TransportError::Status {
                status_code,
                status_text: String::new(),
                reason: "connection reset while reading body".to_string(),
            }),
            Step::Unreachable => Err(TransportError::Unreachable("connection refused".to_string())),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(TransportError::Unreachable("hung".to_string()))
            }
        }
    }
}
