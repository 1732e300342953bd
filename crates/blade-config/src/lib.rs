//! # blade-config
//!
//! Configuration system for the blade runtime. Reads from `blade.toml` and
//! environment variables, in that precedence order; CLI flags are applied by
//! the caller on top of the loaded value.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::BladeConfig;
pub use schema::{ConfigWarning, WarningSeverity};
