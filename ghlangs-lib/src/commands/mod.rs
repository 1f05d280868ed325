//! Command-line interface and orchestration for ghlangs
//!
//! This module implements the CLI commands and drives the collection pipeline and the
//! report generators end to end. It handles argument parsing, configuration management,
//! and the high-level workflow.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **collect**: Page through the account's owned and contributed repositories, fold
//!   their language sizes, write the SVG card (and optionally a JSON dump), then print
//!   detailed statistics
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. `collect` proceeds as follows:
//!
//! 1. Set up logging and validate the credentials, before any network activity
//! 2. Load configuration (`ghlangs.toml`) and apply command-line overrides
//! 3. Build the GraphQL client and executor, and run the collector
//! 4. Rank the languages and generate the reports
//!
//! All output goes through the [`Host`] trait so the commands can be exercised in tests.

mod collect;
mod common;
mod config;
mod host;
mod init;
mod progress_reporter;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use collect::{CollectArgs, process_collect};
pub use common::{ColorMode, LogLevel};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
