//! REST transport for the OPA API
//!
//! Owns the `reqwest` client, the parsed base url and the default headers, and
//! turns HTTP outcomes into `OpaError`s.

use std::{collections::HashMap, time::Duration};

use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};
use url::Url;

use crate::{
    config::{HttpVersion, OpaConfiguration},
    constants::content_type,
    error::{OpaError, Result},
};

/// HTTP client bound to a single OPA server
#[derive(Debug)]
pub struct OpaRestClient {
    client: Client,
    base_url: Url,
    configuration: OpaConfiguration,
}

impl OpaRestClient {
    /// Create a new REST client, validating the url and headers up front
    pub fn new(configuration: OpaConfiguration) -> Result<Self> {
        let base_url = Url::parse(&configuration.url)
            .map_err(|e| OpaError::InvalidUrl(format!("{}: {}", configuration.url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(OpaError::InvalidUrl(configuration.url.clone()));
        }

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_millis(configuration.connect_timeout_ms))
            .timeout(Duration::from_millis(configuration.read_timeout_ms))
            .default_headers(build_header_map(&configuration.headers)?);

        // HTTP/2 is negotiated through ALPN on TLS connections
        if configuration.http_version == HttpVersion::Http1_1 {
            builder = builder.http1_only();
        }

        let client = builder.build()?;
        debug!(
            "Created OPA client for {} ({})",
            base_url, configuration.http_version
        );

        Ok(Self {
            client,
            base_url,
            configuration,
        })
    }

    pub fn configuration(&self) -> &OpaConfiguration {
        &self.configuration
    }

    /// Build the full url: base url path, then `prefix`, then each non-empty segment of `path`
    pub fn endpoint(&self, prefix: &[&str], path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| OpaError::InvalidUrl(self.configuration.url.clone()))?;
            segments.pop_if_empty();
            segments.extend(prefix.iter().copied());
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    /// Make a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, prefix: &[&str], path: &str) -> Result<T> {
        let url = self.endpoint(prefix, path)?;
        debug!("GET {}", url);
        let request = self
            .client
            .get(url.clone())
            .header(ACCEPT, content_type::JSON);
        let response = self.send(request, &url).await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body and decode the JSON response
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        prefix: &[&str],
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(prefix, path)?;
        debug!("POST {}", url);
        let request = self
            .client
            .post(url.clone())
            .header(ACCEPT, content_type::JSON)
            .json(body);
        let response = self.send(request, &url).await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body, discarding the response body
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        prefix: &[&str],
        path: &str,
        body: &B,
    ) -> Result<()> {
        let url = self.endpoint(prefix, path)?;
        debug!("PUT {}", url);
        let request = self.client.put(url.clone()).json(body);
        let response = self.send(request, &url).await?;
        Self::handle_empty_response(response).await
    }

    /// Make a PUT request with a plain text body, discarding the response body
    pub async fn put_text(&self, prefix: &[&str], path: &str, body: &str) -> Result<()> {
        let url = self.endpoint(prefix, path)?;
        debug!("PUT {} ({} bytes)", url, body.len());
        let request = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, content_type::TEXT)
            .body(body.to_string());
        let response = self.send(request, &url).await?;
        Self::handle_empty_response(response).await
    }

    /// Make a DELETE request, discarding the response body
    pub async fn delete(&self, prefix: &[&str], path: &str) -> Result<()> {
        let url = self.endpoint(prefix, path)?;
        debug!("DELETE {}", url);
        let response = self.send(self.client.delete(url.clone()), &url).await?;
        Self::handle_empty_response(response).await
    }

    /// Make a GET request and return only the status code
    pub async fn get_status(&self, prefix: &[&str], path: &str) -> Result<StatusCode> {
        let url = self.endpoint(prefix, path)?;
        debug!("GET {}", url);
        let response = self.send(self.client.get(url.clone()), &url).await?;
        Ok(response.status())
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
        request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                warn!("OPA server unreachable at {}: {}", url, e);
                OpaError::ServerConnection {
                    url: url.to_string(),
                    source: e,
                }
            } else {
                OpaError::Http(e)
            }
        })
    }

    /// Handle response and parse JSON
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn handle_empty_response(response: Response) -> Result<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read error body from {}: {}", url, e);
                String::new()
            }
        };
        error!("Request to {} failed with status {}: {}", url, status, body);
        Err(OpaError::RequestFailed {
            status: status.as_u16(),
            body,
        })
    }
}

fn build_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| OpaError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| OpaError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
