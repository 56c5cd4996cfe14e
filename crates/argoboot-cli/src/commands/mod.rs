//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments and [`crate::config::AppConfig`] into
//! adapters and a [`argoboot_core::prelude::BootstrapService`], run one
//! workflow and report the result through [`crate::output::OutputManager`].

pub mod completions;
pub mod config;
pub mod deploy;
pub mod generate;
pub mod init;
pub mod remove;
pub mod scaffold;
pub mod setup;
mod workflow;
