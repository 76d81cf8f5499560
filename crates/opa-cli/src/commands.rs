// Subcommand execution

use std::path::Path;

use anyhow::{Context, bail};
use opa_client::{
    OpaClient, OpaDataApi, OpaDocument, OpaPolicy, OpaPolicyApi, OpaQueryApi,
    QueryForDocumentRequest,
};
use serde_json::{Value, json};
use tracing::info;

use crate::cli::{Command, DataCommand, PolicyCommand};

/// Run a subcommand. Returns the JSON to print, if any.
pub async fn run(client: &OpaClient, command: Command) -> anyhow::Result<Option<Value>> {
    match command {
        Command::Health => {
            let status = client.health().await?;
            if !status.is_healthy() {
                bail!("OPA server is unhealthy: {:?}", status);
            }
            Ok(Some(json!({"healthy": true})))
        }
        Command::Query {
            path,
            input,
            input_file,
        } => {
            let input = match (input, input_file) {
                (Some(raw), _) => parse_json(&raw)?,
                (None, Some(file)) => read_json_file(&file)?,
                (None, None) => Value::Null,
            };
            let request = QueryForDocumentRequest::new(input, &path);
            let result: Value = client.query_for_document(&request).await?;
            Ok(Some(result))
        }
        Command::Data(command) => run_data(client, command).await,
        Command::Policy(command) => run_policy(client, command).await,
    }
}

async fn run_data(client: &OpaClient, command: DataCommand) -> anyhow::Result<Option<Value>> {
    match command {
        DataCommand::Put { path, content } => {
            let content = match content.strip_prefix('@') {
                Some(file) => read_json_file(Path::new(file))?,
                None => parse_json(&content)?,
            };
            client
                .create_or_overwrite_document(&OpaDocument::new(&path, content))
                .await?;
            info!("Wrote document at {}", path);
            Ok(None)
        }
        DataCommand::Get { path } => {
            let document: Value = client.get_document(&path).await?;
            Ok(Some(document))
        }
        DataCommand::Delete { path } => {
            client.delete_document(&path).await?;
            info!("Deleted document at {}", path);
            Ok(None)
        }
    }
}

async fn run_policy(client: &OpaClient, command: PolicyCommand) -> anyhow::Result<Option<Value>> {
    match command {
        PolicyCommand::Put { id, file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read policy file {}", file.display()))?;
            client
                .create_or_update_policy(&OpaPolicy::new(&id, &content))
                .await?;
            info!("Uploaded policy {}", id);
            Ok(None)
        }
        PolicyCommand::Get { id } => {
            let policy = client.get_policy(&id).await?;
            Ok(Some(serde_json::to_value(policy)?))
        }
        PolicyCommand::List => {
            let ids: Vec<String> = client
                .list_policies()
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect();
            Ok(Some(json!(ids)))
        }
        PolicyCommand::Delete { id } => {
            client.delete_policy(&id).await?;
            info!("Deleted policy {}", id);
            Ok(None)
        }
    }
}

fn parse_json(raw: &str) -> anyhow::Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("invalid JSON: {}", raw))
}

fn read_json_file(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}
