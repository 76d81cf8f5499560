// OPA REST API path constants

pub const DEFAULT_OPA_URL: &str = "http://localhost:8181";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30000;

pub mod opa_api_path {
    // Path segments, joined onto the server base url
    pub const DATA: &[&str] = &["v1", "data"];
    pub const POLICIES: &[&str] = &["v1", "policies"];
    pub const HEALTH: &[&str] = &["health"];
}

pub mod content_type {
    pub const JSON: &str = "application/json";
    pub const TEXT: &str = "text/plain";
}
