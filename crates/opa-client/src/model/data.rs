// Data document model types

/// A JSON document stored under `/v1/data/{path}`
#[derive(Clone, Debug, PartialEq)]
pub struct OpaDocument {
    pub path: String,
    pub content: serde_json::Value,
}

impl OpaDocument {
    pub fn new(path: &str, content: serde_json::Value) -> Self {
        Self {
            path: path.to_string(),
            content,
        }
    }
}
