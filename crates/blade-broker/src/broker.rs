use blade_core::{ANNOUNCE_TEXT, BladeMsg, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::remote::RemoteStore;

/// This blade's cached view of the coordination service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeState {
    /// The first pending request addressed to this blade.
    pub request: Option<BladeMsg>,
    /// The first pending response sent by this blade.
    pub response: Option<BladeMsg>,
}

impl ExchangeState {
    /// Pick the first request and the first response whose origin is `identity`.
    /// Later matches for the same blade are ignored.
    pub fn select(identity: &str, requests: Vec<BladeMsg>, responses: Vec<BladeMsg>) -> Self {
        Self {
            request: requests.into_iter().find(|m| m.is_from(identity)),
            response: responses.into_iter().find(|m| m.is_from(identity)),
        }
    }
}

/// Keeps the request/response pair in sync with the coordination service and
/// sends this blade's responses.
///
/// The pair is only written by [`refresh`](Self::refresh), and always as a
/// whole, so readers never see a request from one poll next to a response
/// from another.
pub struct MessageBroker {
    identity: String,
    remote: Arc<dyn RemoteStore>,
    exchange: RwLock<ExchangeState>,
}

impl MessageBroker {
    pub fn new(identity: impl Into<String>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            identity: identity.into(),
            remote,
            exchange: RwLock::new(ExchangeState::default()),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Poll both endpoints and replace the cached pair.
    ///
    /// Both reads must succeed. On any failure the cache is cleared to
    /// `(None, None)` and the error is returned; the next poll retries.
    pub async fn refresh(&self) -> Result<ExchangeState> {
        // Both reads always go out, even when one of them fails.
        let (requests, responses) = tokio::join!(
            self.remote.fetch_requests(),
            self.remote.fetch_responses()
        );
        let fetched = requests.and_then(|requests| responses.map(|responses| (requests, responses)));

        match fetched {
            Ok((requests, responses)) => {
                let state = ExchangeState::select(&self.identity, requests, responses);
                debug!(
                    blade = %self.identity,
                    has_request = state.request.is_some(),
                    has_response = state.response.is_some(),
                    "exchange refreshed"
                );
                *self.exchange.write() = state.clone();
                Ok(state)
            }
            Err(e) => {
                *self.exchange.write() = ExchangeState::default();
                Err(e)
            }
        }
    }

    /// Send `text` as this blade's response.
    ///
    /// Refused without a network call while a response from this blade is
    /// still cached. The guard only knows what the last poll saw: two sends
    /// inside one poll window both go out, and a response the service already
    /// consumed keeps blocking until the next poll.
    pub async fn send_response(&self, text: &str) -> bool {
        if self.exchange.read().response.is_some() {
            warn!(blade = %self.identity, "response already pending, not sending");
            return false;
        }

        let msg = BladeMsg::new(self.identity.clone(), text);
        match self.remote.post_response(&msg).await {
            Ok(()) => true,
            Err(e) => {
                warn!(blade = %self.identity, error = %e, "couldn't send response");
                false
            }
        }
    }

    /// Tell the service this blade exists.
    pub async fn announce(&self) -> bool {
        self.send_response(ANNOUNCE_TEXT).await
    }

    /// The cached pending request, if any.
    pub fn current_request(&self) -> Option<BladeMsg> {
        self.exchange.read().request.clone()
    }

    /// The cached pending response, if any.
    pub fn current_response(&self) -> Option<BladeMsg> {
        self.exchange.read().response.clone()
    }

    /// Both halves of the cache, read together.
    pub fn snapshot(&self) -> ExchangeState {
        self.exchange.read().clone()
    }

    /// Release the remote client.
    pub fn close(&self) {
        self.remote.close();
    }
}
