//! # blade-cli
//!
//! Command-line interface for the blade runtime.
//!
//! ## Commands
//!
//! - `blade start` - Run the blade until ctrl-c
//! - `blade behaviors` - List the discovered behaviors
//! - `blade poll` - Poll the coordination service once
//! - `blade send` - Send one response as this blade
//! - `blade inspect` - Show how a message payload is interpreted
//! - `blade config` - Show the effective configuration

pub mod commands;

pub use commands::Cli;
