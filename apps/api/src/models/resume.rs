use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resume as the browser stores it: `basics` plus a `sections` map.
///
/// The shape is deliberately not pinned to a rigid struct. Unknown sections
/// and item fields are legal, and everything downstream (diffing, validation)
/// walks the tree structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeDocument(Value);

impl ResumeDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn basics(&self) -> Option<&Map<String, Value>> {
        self.0.get("basics").and_then(Value::as_object)
    }

    /// Candidate name from `basics.name`, if any.
    pub fn name(&self) -> Option<&str> {
        self.basics()
            .and_then(|b| b.get("name"))
            .and_then(Value::as_str)
    }

    /// Pretty-printed JSON exactly as stored, used for the raw JSON download.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }
}
