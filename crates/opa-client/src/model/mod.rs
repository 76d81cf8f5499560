// Model types for OPA API requests and responses

pub mod common;
pub mod data;
pub mod policy;
pub mod query;

pub use common::HealthStatus;
pub use data::OpaDocument;
pub use policy::{OpaPolicy, PolicyModule};
pub use query::QueryForDocumentRequest;
