//! # blade-broker
//!
//! Correlates this blade's locally cached request/response pair with the
//! coordination service. The service is only ever polled; there is no push.
//!
//! ## Wire format
//!
//! Both endpoints exchange `{origin, data}` objects:
//!
//! ```text
//! GET  <requests_url>   -> [{"origin": "kitchen", "data": "lights on"}, ...]
//! GET  <responses_url>  -> [{"origin": "den", "data": "done"}, ...]
//! POST <responses_url>  <- {"origin": "kitchen", "data": "ok"}
//! ```

pub mod broker;
pub mod mock;
pub mod remote;

pub use broker::{ExchangeState, MessageBroker};
pub use mock::MockRemote;
pub use remote::{HttpRemote, RemoteStore};
