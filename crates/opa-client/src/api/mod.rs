// OPA API traits and their REST-backed implementations

pub mod data;
pub mod policy;
pub mod query;

pub use data::{OpaDataApi, OpaDataClient};
pub use policy::{OpaPolicyApi, OpaPolicyClient};
pub use query::{OpaQueryApi, OpaQueryClient};
