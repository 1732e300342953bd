//! Behaviors shipped with the `blade` binary.

use std::sync::Arc;

use async_trait::async_trait;
use blade_core::{BladeMsg, Result, lang};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::behavior::{Behavior, BehaviorContext, Capability};
use crate::registry::BehaviorFactory;

/// The manifest used by the binary, in discovery order.
pub fn builtin_factories() -> Vec<BehaviorFactory> {
    vec![
        BehaviorFactory::new("lifecycle-log", lifecycle_log),
        BehaviorFactory::new("ping", ping),
        BehaviorFactory::new("request-log", request_log),
    ]
}

fn lifecycle_log() -> Result<Arc<dyn Behavior>> {
    Ok(Arc::new(LifecycleLog))
}

fn ping() -> Result<Arc<dyn Behavior>> {
    Ok(Arc::new(Ping::default()))
}

fn request_log() -> Result<Arc<dyn Behavior>> {
    Ok(Arc::new(RequestLog::default()))
}

/// Logs when the blade comes online and goes offline.
pub struct LifecycleLog;

#[async_trait]
impl Behavior for LifecycleLog {
    fn name(&self) -> &str {
        "lifecycle-log"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::Start, Capability::Stop]
    }

    async fn start(&self, ctx: &BehaviorContext) -> Result<()> {
        info!(blade = %ctx.identity(), "blade online");
        Ok(())
    }

    async fn stop(&self, ctx: &BehaviorContext) -> Result<()> {
        info!(blade = %ctx.identity(), "blade offline");
        Ok(())
    }
}

/// Logs each pending request once, the first time a poll sees it.
#[derive(Default)]
pub struct RequestLog {
    last_seen: Mutex<Option<BladeMsg>>,
}

#[async_trait]
impl Behavior for RequestLog {
    fn name(&self) -> &str {
        "request-log"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::WebUpdate]
    }

    async fn web_update(&self, ctx: &BehaviorContext) -> Result<()> {
        let current = ctx.current_request();
        let mut last_seen = self.last_seen.lock();
        if current != *last_seen {
            if let Some(ref req) = current {
                info!(
                    blade = %ctx.identity(),
                    request = %req.text(),
                    question = lang::looks_like_question(req),
                    "new request"
                );
            }
            *last_seen = current;
        }
        Ok(())
    }
}

/// Answers a request of `ping` with `pong`, once per request.
#[derive(Default)]
pub struct Ping {
    answered: Mutex<Option<BladeMsg>>,
}

#[async_trait]
impl Behavior for Ping {
    fn name(&self) -> &str {
        "ping"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::WebUpdate]
    }

    async fn web_update(&self, ctx: &BehaviorContext) -> Result<()> {
        let Some(req) = ctx.current_request() else {
            return Ok(());
        };
        if lang::raw(&req).as_deref() != Some("ping") {
            return Ok(());
        }
        if self.answered.lock().as_ref() == Some(&req) {
            return Ok(());
        }

        if ctx.send_response("pong").await {
            debug!(blade = %ctx.identity(), "answered ping");
            *self.answered.lock() = Some(req);
        }
        Ok(())
    }
}
