//! opa-client - HTTP client for the Open Policy Agent REST API
//!
//! This crate provides:
//! - `OpaClient` facade with a builder for url, HTTP version and headers
//! - Query API for evaluating documents against an input
//! - Data API for storing, reading and removing documents
//! - Policy API for managing Rego policy modules

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod rest;

pub use api::{
    OpaDataApi, OpaDataClient, OpaPolicyApi, OpaPolicyClient, OpaQueryApi, OpaQueryClient,
};
pub use client::{OpaClient, OpaClientBuilder};
pub use config::{HttpVersion, OpaConfiguration};
pub use error::{OpaError, Result};
pub use model::{HealthStatus, OpaDocument, OpaPolicy, PolicyModule, QueryForDocumentRequest};
pub use rest::OpaRestClient;
