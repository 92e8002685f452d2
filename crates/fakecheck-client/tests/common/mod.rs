//! Shared scripted transport for client integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use fakecheck_client::{AnalysisTransport, TransportError, TransportResponse};
use fakecheck_core::SubmissionPayload;
use url::Url;

/// One scripted transport reaction.
#[allow(dead_code)]
pub enum Step {
    /// Respond immediately with status and body.
    Respond(u16, &'static str),
    /// Fail at the connection level.
    Fail(&'static str),
    /// Respond with `{}` after the given delay.
    Stall(Duration),
}

/// Transport replaying scripted steps in order.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    endpoints: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
            endpoints: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.lock().expect("endpoint lock should work").clone()
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn post(
        &self,
        endpoint: &Url,
        _payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.endpoints
            .lock()
            .expect("endpoint lock should work")
            .push(endpoint.to_string());

        let step = self
            .steps
            .lock()
            .expect("step lock should work")
            .pop_front()
            .unwrap_or(Step::Respond(200, "{}"));

        match step {
            Step::Respond(status, body) => Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            Step::Fail(message) => Err(TransportError(message.to_string())),
            Step::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(TransportResponse {
                    status: 200,
                    body: b"{}".to_vec(),
                })
            }
        }
    }
}
