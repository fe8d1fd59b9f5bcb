//! Console stand-in for the chat platform: lines typed (or piped) into the
//! shell become inbound events and notifications are printed back.

mod console;
mod input;
mod shell;

pub use console::ConsoleNotifier;
pub use input::{parse_line, MetaCommand, ShellInput};
pub use shell::{run_cli, CliMode, ShellContext};

use thiserror::Error;

use crate::{bot::BotError, config::ConfigError, errors::TrackerError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<BotError> for CliError {
    fn from(err: BotError) -> Self {
        match err {
            BotError::Core(err) => CliError::Core(err),
            BotError::Invalid(message) => CliError::Command(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(TrackerError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Core(err.into())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}
