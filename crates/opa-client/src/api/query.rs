// Query API: evaluate a document against an input

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    constants::opa_api_path,
    error::{OpaError, Result},
    model::{QueryForDocumentRequest, common::OpaResponse},
    rest::OpaRestClient,
};

#[async_trait]
pub trait OpaQueryApi {
    /// Evaluate the document at `request.path` with `request.input`.
    ///
    /// Fails with `OpaError::UndefinedDocument` when the server returns no result.
    async fn query_for_document<R>(&self, request: &QueryForDocumentRequest) -> Result<R>
    where
        R: DeserializeOwned + Send;
}

pub struct OpaQueryClient {
    rest_client: Arc<OpaRestClient>,
}

impl OpaQueryClient {
    pub fn new(rest_client: Arc<OpaRestClient>) -> Self {
        Self { rest_client }
    }
}

#[async_trait]
impl OpaQueryApi for OpaQueryClient {
    async fn query_for_document<R>(&self, request: &QueryForDocumentRequest) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        debug!("Querying document at {}", request.path);
        let response: OpaResponse<R> = self
            .rest_client
            .post_json(opa_api_path::DATA, &request.path, request)
            .await?;
        response
            .result
            .ok_or_else(|| OpaError::UndefinedDocument(request.path.clone()))
    }
}
