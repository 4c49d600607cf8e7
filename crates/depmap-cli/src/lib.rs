//! Depmap CLI - interactive dependency elicitation interview.

pub mod cli;
pub mod error;
pub mod interview;

pub use cli::Cli;
pub use error::{CliError, Result};
