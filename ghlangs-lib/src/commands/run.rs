//! Command dispatch logic for ghlangs

use super::{CollectArgs, InitArgs, init_config, process_collect};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "ghlangs", version, author, long_about = None)]
#[command(about = "Chart the languages used across a GitHub account's repositories")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: GhlangsSubcommand,
}

#[derive(Subcommand, Debug)]
enum GhlangsSubcommand {
    /// Collect language statistics and generate the SVG card
    Collect(Box<CollectArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        GhlangsSubcommand::Collect(collect_args) => process_collect(host, collect_args).await,
        GhlangsSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
