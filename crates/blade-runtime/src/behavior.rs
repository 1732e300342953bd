use async_trait::async_trait;
use blade_broker::MessageBroker;
use blade_core::{BladeMsg, Result};
use std::sync::Arc;

/// A lifecycle hook a behavior can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Start,
    Stop,
    Update,
    WebUpdate,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Start,
        Capability::Stop,
        Capability::Update,
        Capability::WebUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Start => "start",
            Capability::Stop => "stop",
            Capability::Update => "update",
            Capability::WebUpdate => "web_update",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a behavior can see of the running blade.
#[derive(Clone)]
pub struct BehaviorContext {
    broker: Arc<MessageBroker>,
}

impl BehaviorContext {
    pub fn new(broker: Arc<MessageBroker>) -> Self {
        Self { broker }
    }

    /// Name of this blade.
    pub fn identity(&self) -> &str {
        self.broker.identity()
    }

    pub fn broker(&self) -> &Arc<MessageBroker> {
        &self.broker
    }

    /// The request addressed to this blade at the last poll.
    pub fn current_request(&self) -> Option<BladeMsg> {
        self.broker.current_request()
    }

    /// Send a response; `false` if it was refused or failed.
    pub async fn send_response(&self, text: &str) -> bool {
        self.broker.send_response(text).await
    }
}

/// A plugin unit driven by the scheduler.
///
/// Only the hooks named in [`capabilities`](Behavior::capabilities) are ever
/// called. Within one phase, behaviors run one after another by ascending
/// [`priority`](Behavior::priority); an `Err` (or a panic) skips the rest of
/// that phase firing only.
#[async_trait]
pub trait Behavior: Send + Sync {
    fn name(&self) -> &str;

    /// Lower runs first. Must not change after construction.
    fn priority(&self) -> i32 {
        0
    }

    /// Checked before every invocation.
    fn enabled(&self) -> bool {
        true
    }

    fn capabilities(&self) -> &[Capability];

    async fn start(&self, _ctx: &BehaviorContext) -> Result<()> {
        Ok(())
    }

    async fn stop(&self, _ctx: &BehaviorContext) -> Result<()> {
        Ok(())
    }

    async fn update(&self, _ctx: &BehaviorContext) -> Result<()> {
        Ok(())
    }

    /// Called after each successful poll of the coordination service.
    async fn web_update(&self, _ctx: &BehaviorContext) -> Result<()> {
        Ok(())
    }
}
