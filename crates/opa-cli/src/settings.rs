//! CLI settings, layered from defaults, an optional settings file, `OPA_*`
//! environment variables and finally command-line flags.

use std::{collections::HashMap, fmt};

use anyhow::Context;
use config::{Config, Environment};
use opa_client::{
    HttpVersion, OpaConfiguration,
    constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_OPA_URL, DEFAULT_READ_TIMEOUT_MS},
};
use serde::Deserialize;

use crate::cli::Cli;

const ENV_PREFIX: &str = "OPA";

#[derive(Clone, Deserialize, PartialEq)]
pub struct CliSettings {
    pub url: String,
    #[serde(default)]
    pub http_version: Option<HttpVersion>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

// Header values carry credentials, only their names are printed.
impl fmt::Debug for CliSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header_names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();
        f.debug_struct("CliSettings")
            .field("url", &self.url)
            .field("http_version", &self.http_version)
            .field("headers", &header_names)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("read_timeout_ms", &self.read_timeout_ms)
            .finish()
    }
}

impl CliSettings {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        Self::load_with_env(cli, None)
    }

    /// Same as `load`, reading environment variables from `env` instead of the process when given
    pub fn load_with_env(
        cli: &Cli,
        env: Option<config::Map<String, String>>,
    ) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .set_default("url", DEFAULT_OPA_URL)?
            .set_default("connect_timeout_ms", DEFAULT_CONNECT_TIMEOUT_MS)?
            .set_default("read_timeout_ms", DEFAULT_READ_TIMEOUT_MS)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(config::File::from(path.as_path()).required(true));
        }

        // Values stay strings; typed fields parse them on deserialize
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).source(env));

        if let Some(url) = &cli.url {
            builder = builder.set_override("url", url.as_str())?;
        }
        if cli.http2 {
            builder = builder.set_override("http_version", HttpVersion::Http2.to_string())?;
        }

        let mut settings: CliSettings = builder
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;

        for (name, value) in &cli.headers {
            settings
                .headers
                .retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            settings.headers.insert(name.clone(), value.clone());
        }

        Ok(settings)
    }

    pub fn to_configuration(&self) -> OpaConfiguration {
        let configuration = OpaConfiguration::new(&self.url)
            .with_headers(self.headers.clone())
            .with_timeouts(self.connect_timeout_ms, self.read_timeout_ms);
        match self.http_version {
            Some(http_version) => configuration.with_http_version(http_version),
            None => configuration,
        }
    }
}
