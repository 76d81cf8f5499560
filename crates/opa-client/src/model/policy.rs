// Policy model types

use serde::{Deserialize, Serialize};

/// A Rego policy module to upload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaPolicy {
    pub id: String,
    pub content: String,
}

impl OpaPolicy {
    pub fn new(id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            content: content.to_string(),
        }
    }
}

/// A policy module as reported by the server
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyModule {
    pub id: String,
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<serde_json::Value>,
}
