// Query model types

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::error::Result;

/// Request to evaluate the document at `path` against `input`
#[derive(Clone, Debug, PartialEq)]
pub struct QueryForDocumentRequest {
    pub input: serde_json::Value,
    pub path: String,
}

impl QueryForDocumentRequest {
    pub fn new(input: serde_json::Value, path: &str) -> Self {
        Self {
            input,
            path: path.to_string(),
        }
    }

    /// Build a request from any serializable input
    pub fn from_input<T: Serialize + ?Sized>(input: &T, path: &str) -> Result<Self> {
        Ok(Self::new(serde_json::to_value(input)?, path))
    }
}

// The path travels in the url, only the input goes into the body.
impl Serialize for QueryForDocumentRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QueryForDocumentRequest", 1)?;
        state.serialize_field("input", &self.input)?;
        state.end()
    }
}
