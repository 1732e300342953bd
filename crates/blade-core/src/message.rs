use serde::{Deserialize, Deserializer, Serialize};

/// Text a blade sends once at start so the coordination service learns it exists.
pub const ANNOUNCE_TEXT: &str = "--postblade";

/// A unit of text exchanged with the coordination service.
///
/// There is no id, timestamp or sequence number: a message belongs to a blade
/// when its `origin` equals that blade's name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BladeMsg {
    /// The blade this message corresponds to.
    #[serde(default, alias = "Origin", deserialize_with = "null_as_empty")]
    pub origin: String,
    /// The text sent to or from the blade.
    #[serde(default, alias = "Data")]
    pub data: Option<String>,
}

impl BladeMsg {
    pub fn new(origin: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            data: Some(data.into()),
        }
    }

    /// Whether this message belongs to the blade named `identity`.
    pub fn is_from(&self, identity: &str) -> bool {
        self.origin == identity
    }

    /// The payload, or `""` when absent.
    pub fn text(&self) -> &str {
        self.data.as_deref().unwrap_or_default()
    }
}

// The service emits `null` for messages it has not attributed yet.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
