//! # blade-core
//!
//! Core types and primitives for the blade runtime.
//! This crate defines the shared vocabulary used by every other crate in the workspace:
//! the error type, the message exchanged with the coordination service, and the
//! text helpers behaviors use to read messages.

pub mod error;
pub mod lang;
pub mod message;

pub use error::{BladeError, Result};
pub use message::{ANNOUNCE_TEXT, BladeMsg};
