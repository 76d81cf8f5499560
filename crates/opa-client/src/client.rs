// OpaClient - facade for the query, data and policy APIs

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    api::{
        OpaDataApi, OpaDataClient, OpaPolicyApi, OpaPolicyClient, OpaQueryApi, OpaQueryClient,
    },
    config::{HttpVersion, OpaConfiguration},
    constants::opa_api_path,
    error::{OpaError, Result},
    model::{HealthStatus, OpaDocument, OpaPolicy, PolicyModule, QueryForDocumentRequest},
    rest::OpaRestClient,
};

/// OPA client featuring `OpaQueryApi`, `OpaDataApi` and `OpaPolicyApi`
pub struct OpaClient {
    rest_client: Arc<OpaRestClient>,
    query_api: OpaQueryClient,
    data_api: OpaDataClient,
    policy_api: OpaPolicyClient,
}

impl OpaClient {
    pub fn builder() -> OpaClientBuilder {
        OpaClientBuilder::default()
    }

    /// Create a client straight from a configuration
    pub fn new(configuration: OpaConfiguration) -> Result<Self> {
        let rest_client = Arc::new(OpaRestClient::new(configuration)?);
        Ok(Self {
            query_api: OpaQueryClient::new(rest_client.clone()),
            data_api: OpaDataClient::new(rest_client.clone()),
            policy_api: OpaPolicyClient::new(rest_client.clone()),
            rest_client,
        })
    }

    pub fn configuration(&self) -> &OpaConfiguration {
        self.rest_client.configuration()
    }

    /// Probe `/health`. Connection failures are errors, non-2xx answers are `Unhealthy`.
    pub async fn health(&self) -> Result<HealthStatus> {
        let status = self
            .rest_client
            .get_status(opa_api_path::HEALTH, "")
            .await?;
        if status.is_success() {
            Ok(HealthStatus::Healthy)
        } else {
            warn!("OPA health check returned {}", status);
            Ok(HealthStatus::Unhealthy {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl OpaQueryApi for OpaClient {
    async fn query_for_document<R>(&self, request: &QueryForDocumentRequest) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        self.query_api.query_for_document(request).await
    }
}

#[async_trait]
impl OpaDataApi for OpaClient {
    async fn create_or_overwrite_document(&self, document: &OpaDocument) -> Result<()> {
        self.data_api.create_or_overwrite_document(document).await
    }

    async fn get_document<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        self.data_api.get_document(path).await
    }

    async fn delete_document(&self, path: &str) -> Result<()> {
        self.data_api.delete_document(path).await
    }
}

#[async_trait]
impl OpaPolicyApi for OpaClient {
    async fn create_or_update_policy(&self, policy: &OpaPolicy) -> Result<()> {
        self.policy_api.create_or_update_policy(policy).await
    }

    async fn get_policy(&self, id: &str) -> Result<PolicyModule> {
        self.policy_api.get_policy(id).await
    }

    async fn list_policies(&self) -> Result<Vec<PolicyModule>> {
        self.policy_api.list_policies().await
    }

    async fn delete_policy(&self, id: &str) -> Result<()> {
        self.policy_api.delete_policy(id).await
    }
}

/// Builder for `OpaClient`.
///
/// Headers may be added before or after the url; all of them end up in the
/// final configuration.
#[derive(Clone, Debug, Default)]
pub struct OpaClientBuilder {
    configuration: Option<OpaConfiguration>,
    headers: HashMap<String, String>,
    http_version: Option<HttpVersion>,
    timeouts: Option<(u64, u64)>,
}

impl OpaClientBuilder {
    /// Server url including protocol and port. Uses HTTP/1.1 unless `http_version` says otherwise.
    pub fn opa_configuration(mut self, url: &str) -> Self {
        let configuration = match self.configuration.take() {
            Some(existing) => OpaConfiguration {
                url: url.to_string(),
                http_version: HttpVersion::Http1_1,
                ..existing
            },
            None => OpaConfiguration::new(url).with_http_version(HttpVersion::Http1_1),
        };
        self.configuration = Some(configuration);
        self
    }

    /// Use a full configuration; headers given to the builder are merged on top
    pub fn configuration(mut self, configuration: OpaConfiguration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Add a header that will be included in all requests to the OPA server
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Add multiple headers that will be included in all requests to the OPA server
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn http_version(mut self, http_version: HttpVersion) -> Self {
        self.http_version = Some(http_version);
        self
    }

    pub fn timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.timeouts = Some((connect_ms, read_ms));
        self
    }

    /// The configuration `build` would use
    pub fn resolve_configuration(&self) -> Result<OpaConfiguration> {
        let mut configuration = self
            .configuration
            .clone()
            .ok_or(OpaError::MissingConfiguration)?
            .with_headers(self.headers.clone());
        if let Some(http_version) = self.http_version {
            configuration.http_version = http_version;
        }
        if let Some((connect_ms, read_ms)) = self.timeouts {
            configuration = configuration.with_timeouts(connect_ms, read_ms);
        }
        Ok(configuration)
    }

    pub fn build(self) -> Result<OpaClient> {
        OpaClient::new(self.resolve_configuration()?)
    }
}
