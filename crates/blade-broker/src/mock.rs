//! In-memory coordination service for deterministic testing.
//!
//! Serves whatever lists it was given and records every call, without making
//! any HTTP requests.

use async_trait::async_trait;
use blade_core::{BladeError, BladeMsg, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// What one endpoint of the mock answers with.
#[derive(Debug, Clone)]
pub enum MockEndpoint {
    Ok(Vec<BladeMsg>),
    Status(u16),
}

impl Default for MockEndpoint {
    fn default() -> Self {
        Self::Ok(vec![])
    }
}

/// A mock [`RemoteStore`](crate::RemoteStore).
///
/// # Example
/// ```
/// use blade_broker::MockRemote;
/// use blade_core::BladeMsg;
/// let remote = MockRemote::new()
///     .with_requests(vec![BladeMsg::new("kitchen", "lights on")]);
/// ```
#[derive(Default)]
pub struct MockRemote {
    requests: Mutex<MockEndpoint>,
    responses: Mutex<MockEndpoint>,
    post_status: Mutex<Option<u16>>,
    posted: Mutex<Vec<BladeMsg>>,
    fetch_calls: AtomicUsize,
    closed: AtomicBool,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requests(self, list: Vec<BladeMsg>) -> Self {
        self.set_requests(MockEndpoint::Ok(list));
        self
    }

    pub fn with_responses(self, list: Vec<BladeMsg>) -> Self {
        self.set_responses(MockEndpoint::Ok(list));
        self
    }

    /// Make every POST fail with `status`.
    pub fn with_post_status(self, status: u16) -> Self {
        *self.post_status.lock() = Some(status);
        self
    }

    /// Change the requests endpoint while the mock is shared.
    pub fn set_requests(&self, endpoint: MockEndpoint) {
        *self.requests.lock() = endpoint;
    }

    /// Change the responses endpoint while the mock is shared.
    pub fn set_responses(&self, endpoint: MockEndpoint) {
        *self.responses.lock() = endpoint;
    }

    /// Every message POSTed so far, in order.
    pub fn posted(&self) -> Vec<BladeMsg> {
        self.posted.lock().clone()
    }

    /// Number of GETs served (both endpoints).
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn serve(&self, endpoint: &Mutex<MockEndpoint>, name: &str) -> Result<Vec<BladeMsg>> {
        if self.is_closed() {
            return Err(BladeError::RemoteClosed);
        }
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match &*endpoint.lock() {
            MockEndpoint::Ok(list) => Ok(list.clone()),
            MockEndpoint::Status(status) => Err(BladeError::RemoteStatus {
                endpoint: name.to_string(),
                status: *status,
            }),
        }
    }
}

#[async_trait]
impl crate::RemoteStore for MockRemote {
    async fn fetch_requests(&self) -> Result<Vec<BladeMsg>> {
        self.serve(&self.requests, "mock/requests")
    }

    async fn fetch_responses(&self) -> Result<Vec<BladeMsg>> {
        self.serve(&self.responses, "mock/responses")
    }

    async fn post_response(&self, msg: &BladeMsg) -> Result<()> {
        if self.is_closed() {
            return Err(BladeError::RemoteClosed);
        }
        // Failed posts still count as attempts.
        self.posted.lock().push(msg.clone());
        match *self.post_status.lock() {
            Some(status) => Err(BladeError::RemoteStatus {
                endpoint: "mock/responses".into(),
                status,
            }),
            None => Ok(()),
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
