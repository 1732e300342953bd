//! # blade-runtime
//!
//! The blade runtime: finds the behaviors, drives them through their
//! lifecycle phases, and keeps the blade in touch with the coordination
//! service.
//!
//! ## Architecture
//!
//! ```text
//!   BehaviorFactory manifest
//!              │ discover
//!              ▼
//!     ┌──────────────────┐
//!     │ BehaviorRegistry │  start / stop / update / web_update lists
//!     └────────┬─────────┘
//!              │
//!              ▼
//!     ┌──────────────────┐   refresh / send_response   ┌───────────────┐
//!     │  PhaseScheduler  │ ──────────────────────────▶ │ MessageBroker │ ──▶ remote
//!     │                  │                             └───────────────┘
//!     │  Start           │                                     ▲
//!     │  Update    100ms │                                     │ current_request
//!     │  StatusLog  90s  │ ──▶ behaviors ──────────────────────┘
//!     │  RemotePoll  2s  │
//!     │  Stop            │
//!     └──────────────────┘
//! ```

pub mod behavior;
pub mod builtin;
pub mod registry;
pub mod scheduler;
pub mod service;
pub mod shutdown;

pub use behavior::{Behavior, BehaviorContext, Capability};
pub use builtin::builtin_factories;
pub use registry::{BehaviorEntry, BehaviorFactory, BehaviorRegistry, CapabilityLists};
pub use scheduler::{PassReport, PhaseScheduler, SchedulerState};
pub use service::BladeService;
