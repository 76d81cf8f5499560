// Configuration for OpaClient

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_OPA_URL, DEFAULT_READ_TIMEOUT_MS};

/// HTTP protocol version preferred when talking to the OPA server.
///
/// Settings files and environment variables go through `FromStr`, so
/// `HTTP_2`, `http2` and `2` are all accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpVersion {
    #[default]
    Http1_1,
    /// Negotiated through ALPN on `https` urls. Plain `http` urls stay on
    /// HTTP/1.1, there is no cleartext h2c upgrade.
    Http2,
}

impl HttpVersion {
    /// HTTP/2 for `https` urls, HTTP/1.1 for everything else
    pub fn for_url(url: &str) -> Self {
        match url::Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "https" => HttpVersion::Http2,
            _ => HttpVersion::Http1_1,
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpVersion::Http1_1 => write!(f, "HTTP_1_1"),
            HttpVersion::Http2 => write!(f, "HTTP_2"),
        }
    }
}

impl TryFrom<String> for HttpVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpVersion> for String {
    fn from(version: HttpVersion) -> Self {
        version.to_string()
    }
}

impl FromStr for HttpVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HTTP_1_1" | "HTTP1" | "1.1" => Ok(HttpVersion::Http1_1),
            "HTTP_2" | "HTTP2" | "2" => Ok(HttpVersion::Http2),
            other => Err(format!("unknown HTTP version: {}", other)),
        }
    }
}

/// Everything needed to set up an `OpaClient`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaConfiguration {
    /// Base URL of the OPA server, including protocol and port (e.g. http://localhost:8181)
    pub url: String,
    /// Preferred HTTP version
    pub http_version: HttpVersion,
    /// Headers added to every request
    pub headers: HashMap<String, String>,
    /// Connection timeout in milliseconds (default: 5000)
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds (default: 30000)
    pub read_timeout_ms: u64,
}

impl Default for OpaConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_OPA_URL)
    }
}

impl OpaConfiguration {
    /// Create a configuration for the given url, inferring the HTTP version from its scheme
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            http_version: HttpVersion::for_url(url),
            headers: HashMap::new(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }

    /// Set the preferred HTTP version
    pub fn with_http_version(mut self, http_version: HttpVersion) -> Self {
        self.http_version = http_version;
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Add several headers sent with every request
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }
}
