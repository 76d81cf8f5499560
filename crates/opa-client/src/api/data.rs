// Data API: manage documents under /v1/data

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    constants::opa_api_path,
    error::{OpaError, Result},
    model::{OpaDocument, common::OpaResponse},
    rest::OpaRestClient,
};

#[async_trait]
pub trait OpaDataApi {
    /// Create the document, replacing whatever was stored at its path
    async fn create_or_overwrite_document(&self, document: &OpaDocument) -> Result<()>;

    /// Read the document at `path` without input
    async fn get_document<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned + Send;

    async fn delete_document(&self, path: &str) -> Result<()>;
}

pub struct OpaDataClient {
    rest_client: Arc<OpaRestClient>,
}

impl OpaDataClient {
    pub fn new(rest_client: Arc<OpaRestClient>) -> Self {
        Self { rest_client }
    }
}

#[async_trait]
impl OpaDataApi for OpaDataClient {
    async fn create_or_overwrite_document(&self, document: &OpaDocument) -> Result<()> {
        debug!("Writing document at {}", document.path);
        self.rest_client
            .put_json(opa_api_path::DATA, &document.path, &document.content)
            .await
    }

    async fn get_document<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let response: OpaResponse<R> = self.rest_client.get_json(opa_api_path::DATA, path).await?;
        response
            .result
            .ok_or_else(|| OpaError::UndefinedDocument(path.to_string()))
    }

    async fn delete_document(&self, path: &str) -> Result<()> {
        debug!("Deleting document at {}", path);
        self.rest_client.delete(opa_api_path::DATA, path).await
    }
}
