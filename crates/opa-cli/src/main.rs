use anyhow::Context;
use clap::Parser;
use opa_client::OpaClient;
use tracing::debug;

use opa_cli::{Cli, CliSettings, commands, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = CliSettings::load(&cli)?;
    debug!("Resolved settings: {:?}", settings);

    let client = OpaClient::new(settings.to_configuration())
        .with_context(|| format!("failed to create OPA client for {}", settings.url))?;

    if let Some(output) = commands::run(&client, cli.command).await? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}
