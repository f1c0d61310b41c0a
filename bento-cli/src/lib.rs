//! Bento CLI
//!
//! Terminal front end for the localization console. Each subcommand maps
//! onto one [`bento_client::Console`] operation; session state persists in
//! the configured storage file between invocations.

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod telemetry;

pub use cli::{Args, Command};
pub use error::{CliError, CliResult};
