//! Shared gated transport for app integration tests.
//!
//! Each request blocks until the test releases the gate registered for it,
//! so tests decide exactly when and in which order jobs settle.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fakecheck_client::{AnalysisClient, AnalysisTransport, TransportError, TransportResponse};
use fakecheck_core::SubmissionPayload;
use tokio::sync::oneshot;
use url::Url;

/// Reply released through a gate.
#[allow(dead_code)]
pub enum Reply {
    /// Respond with status and body.
    Respond(u16, &'static str),
    /// Fail at the connection level.
    Fail(&'static str),
}

/// Transport whose requests wait on test-controlled gates, in call order.
#[derive(Default)]
pub struct GatedTransport {
    gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl GatedTransport {
    /// Registers the gate for the next request and returns its release handle.
    pub fn gate(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().expect("gate lock should work").push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Yields until `count` requests have reached the transport.
    pub async fn wait_for_calls(&self, count: usize) {
        for _ in 0..1_000 {
            if self.calls() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {count} calls, saw {}", self.calls());
    }
}

#[async_trait]
impl AnalysisTransport for GatedTransport {
    async fn post(
        &self,
        _endpoint: &Url,
        _payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().expect("gate lock should work").pop_front();

        let reply = match gate {
            Some(gate) => gate
                .await
                .map_err(|_| TransportError("gate dropped".to_string()))?,
            None => Reply::Respond(200, "{}"),
        };

        match reply {
            Reply::Respond(status, body) => Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            Reply::Fail(message) => Err(TransportError(message.to_string())),
        }
    }
}

#[allow(dead_code)]
pub fn client(transport: Arc<GatedTransport>) -> AnalysisClient {
    AnalysisClient::new("https://api.example.test", transport).expect("client should build")
}

/// Releases a gate, ignoring a request that already went away.
#[allow(dead_code)]
pub fn release(gate: oneshot::Sender<Reply>, reply: Reply) {
    let _ = gate.send(reply);
}
