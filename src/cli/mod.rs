//! Command-line interface for listen-lens.
//!
//! The CLI is the host collaborator around the engine: it reads export
//! files, owns the persisted dataset blob, and renders the engine's view
//! items as text. Each subcommand is implemented in its own submodule.

mod commands;

pub use commands::{Cli, Commands, run_command};
