//! # Behavior discovery
//!
//! Candidates come from an explicit manifest of [`BehaviorFactory`] values.
//! Each factory is called once; whatever it yields is filed into one list per
//! capability it advertises, and every list is then stably sorted by priority,
//! so equal priorities keep manifest order.
//!
//! Discovery is best effort: a factory that errors or panics, or an instance
//! that advertises no capability, is left out without failing the rest.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use blade_core::{BladeError, Result};
use tracing::{debug, info};

use crate::behavior::{Behavior, BehaviorContext, Capability};

/// Builds one behavior instance with no arguments.
pub type BehaviorCtor = fn() -> Result<Arc<dyn Behavior>>;

/// One entry of the behavior manifest.
#[derive(Clone, Copy)]
pub struct BehaviorFactory {
    pub name: &'static str,
    pub create: BehaviorCtor,
}

impl BehaviorFactory {
    pub const fn new(name: &'static str, create: BehaviorCtor) -> Self {
        Self { name, create }
    }
}

impl std::fmt::Debug for BehaviorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorFactory").field("name", &self.name).finish()
    }
}

/// A discovered behavior plus the switch the host controls.
pub struct BehaviorEntry {
    name: String,
    priority: i32,
    switch: AtomicBool,
    behavior: Arc<dyn Behavior>,
}

impl BehaviorEntry {
    fn new(behavior: Arc<dyn Behavior>, switched_on: bool) -> Self {
        Self {
            name: behavior.name().to_string(),
            priority: behavior.priority(),
            switch: AtomicBool::new(switched_on),
            behavior,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Priority captured at discovery.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn capabilities(&self) -> &[Capability] {
        self.behavior.capabilities()
    }

    /// Invoked only when the host switch and the behavior itself both agree.
    pub fn is_enabled(&self) -> bool {
        self.switch.load(Ordering::SeqCst) && self.behavior.enabled()
    }

    pub fn set_enabled(&self, on: bool) {
        self.switch.store(on, Ordering::SeqCst);
    }

    /// Run the hook for `phase`.
    pub async fn invoke(&self, phase: Capability, ctx: &BehaviorContext) -> Result<()> {
        match phase {
            Capability::Start => self.behavior.start(ctx).await,
            Capability::Stop => self.behavior.stop(ctx).await,
            Capability::Update => self.behavior.update(ctx).await,
            Capability::WebUpdate => self.behavior.web_update(ctx).await,
        }
    }
}

impl std::fmt::Debug for BehaviorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorEntry")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// The four per-phase lists, each sorted by ascending priority.
#[derive(Debug, Default, Clone)]
pub struct CapabilityLists {
    pub start: Vec<Arc<BehaviorEntry>>,
    pub stop: Vec<Arc<BehaviorEntry>>,
    pub update: Vec<Arc<BehaviorEntry>>,
    pub web_update: Vec<Arc<BehaviorEntry>>,
}

impl CapabilityLists {
    pub fn list(&self, capability: Capability) -> &[Arc<BehaviorEntry>] {
        match capability {
            Capability::Start => &self.start,
            Capability::Stop => &self.stop,
            Capability::Update => &self.update,
            Capability::WebUpdate => &self.web_update,
        }
    }

    fn list_mut(&mut self, capability: Capability) -> &mut Vec<Arc<BehaviorEntry>> {
        match capability {
            Capability::Start => &mut self.start,
            Capability::Stop => &mut self.stop,
            Capability::Update => &mut self.update,
            Capability::WebUpdate => &mut self.web_update,
        }
    }

    /// Sum of the four list lengths; a behavior in two lists counts twice.
    pub fn total(&self) -> usize {
        self.start.len() + self.stop.len() + self.update.len() + self.web_update.len()
    }
}

/// Every discovered behavior, by capability.
#[derive(Debug, Default)]
pub struct BehaviorRegistry {
    entries: Vec<Arc<BehaviorEntry>>,
    lists: CapabilityLists,
}

impl BehaviorRegistry {
    /// Instantiate every factory in manifest order and classify the results.
    /// Behaviors named in `disabled` are registered with their switch off.
    pub fn discover(factories: &[BehaviorFactory], disabled: &[String]) -> Self {
        let behaviors = factories
            .iter()
            .filter_map(|factory| match instantiate(factory) {
                Ok(b) => Some(b),
                Err(e) => {
                    debug!(candidate = factory.name, error = %e, "skipping behavior");
                    None
                }
            })
            .collect();
        Self::from_behaviors(behaviors, disabled)
    }

    /// Classify already-built behaviors; their order is the discovery order.
    pub fn from_behaviors(behaviors: Vec<Arc<dyn Behavior>>, disabled: &[String]) -> Self {
        let mut registry = Self::default();
        let mut summary = Vec::new();

        for behavior in behaviors {
            let caps = dedup(behavior.capabilities());
            if caps.is_empty() {
                debug!(candidate = behavior.name(), "behavior has no capabilities, skipping");
                continue;
            }

            let switched_on = !disabled.iter().any(|d| d == behavior.name());
            let entry = Arc::new(BehaviorEntry::new(behavior, switched_on));
            for cap in &caps {
                registry.lists.list_mut(*cap).push(entry.clone());
            }

            let joined: Vec<&str> = caps.iter().map(Capability::as_str).collect();
            summary.push(format!("{} ({})", entry.name(), joined.join(", ")));
            registry.entries.push(entry);
        }

        for cap in Capability::ALL {
            // Vec::sort_by_key is stable: equal priorities keep discovery order.
            registry.lists.list_mut(cap).sort_by_key(|e| e.priority());
        }

        info!(
            count = registry.entries.len(),
            behaviors = %summary.join("; "),
            "initialized behaviors"
        );
        registry
    }

    pub fn lists(&self) -> &CapabilityLists {
        &self.lists
    }

    /// Discovered behaviors, in discovery order, each once.
    pub fn entries(&self) -> &[Arc<BehaviorEntry>] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Arc<BehaviorEntry>> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Flip the host switch of every behavior called `name`. Returns whether any matched.
    pub fn set_enabled(&self, name: &str, on: bool) -> bool {
        let mut found = false;
        for entry in self.entries.iter().filter(|e| e.name() == name) {
            entry.set_enabled(on);
            found = true;
        }
        found
    }

    pub fn total(&self) -> usize {
        self.lists.total()
    }
}

fn instantiate(factory: &BehaviorFactory) -> Result<Arc<dyn Behavior>> {
    match catch_unwind(AssertUnwindSafe(factory.create)) {
        Ok(result) => result,
        Err(_) => Err(BladeError::Discovery {
            candidate: factory.name.to_string(),
            reason: "constructor panicked".into(),
        }),
    }
}

/// A behavior listing a capability twice still joins that list once.
fn dedup(caps: &[Capability]) -> Vec<Capability> {
    let mut out: Vec<Capability> = Vec::with_capacity(caps.len());
    for cap in caps {
        if !out.contains(cap) {
            out.push(*cap);
        }
    }
    out
}
