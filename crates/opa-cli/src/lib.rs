//! opa-cli - command-line front end for `opa-client`

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;

pub use cli::{Cli, Command, DataCommand, PolicyCommand};
pub use settings::CliSettings;
