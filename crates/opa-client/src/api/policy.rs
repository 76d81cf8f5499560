// Policy API: manage Rego modules under /v1/policies

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    constants::opa_api_path,
    error::{OpaError, Result},
    model::{OpaPolicy, PolicyModule, common::OpaResponse},
    rest::OpaRestClient,
};

#[async_trait]
pub trait OpaPolicyApi {
    /// Upload the policy, replacing any module with the same id
    async fn create_or_update_policy(&self, policy: &OpaPolicy) -> Result<()>;

    async fn get_policy(&self, id: &str) -> Result<PolicyModule>;

    async fn list_policies(&self) -> Result<Vec<PolicyModule>>;

    async fn delete_policy(&self, id: &str) -> Result<()>;
}

pub struct OpaPolicyClient {
    rest_client: Arc<OpaRestClient>,
}

impl OpaPolicyClient {
    pub fn new(rest_client: Arc<OpaRestClient>) -> Self {
        Self { rest_client }
    }
}

#[async_trait]
impl OpaPolicyApi for OpaPolicyClient {
    async fn create_or_update_policy(&self, policy: &OpaPolicy) -> Result<()> {
        debug!("Uploading policy {}", policy.id);
        self.rest_client
            .put_text(opa_api_path::POLICIES, &policy.id, &policy.content)
            .await
    }

    async fn get_policy(&self, id: &str) -> Result<PolicyModule> {
        let response: OpaResponse<PolicyModule> = self
            .rest_client
            .get_json(opa_api_path::POLICIES, id)
            .await?;
        response.result.ok_or_else(|| OpaError::RequestFailed {
            status: 404,
            body: format!("policy {} not found", id),
        })
    }

    async fn list_policies(&self) -> Result<Vec<PolicyModule>> {
        let response: OpaResponse<Vec<PolicyModule>> = self
            .rest_client
            .get_json(opa_api_path::POLICIES, "")
            .await?;
        Ok(response.result.unwrap_or_default())
    }

    async fn delete_policy(&self, id: &str) -> Result<()> {
        debug!("Deleting policy {}", id);
        self.rest_client.delete(opa_api_path::POLICIES, id).await
    }
}
