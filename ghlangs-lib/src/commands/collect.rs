use super::Host;
use super::ProgressReporter;
use super::common::{ColorMode, LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::collect::{Client, Collector, DEFAULT_API_URL, Executor};
use crate::reports::{generate_console, generate_json, generate_svg, rank};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::fs;
use std::io::{Write, stderr, stdout};
use std::sync::Arc;
use std::time::Instant;

const LOG_TARGET: &str = "   command";

const USER_PLACEHOLDER: &str = "<username>";
const TOKEN_PLACEHOLDER: &str = "<token>";

#[derive(Parser, Debug)]
pub struct CollectArgs {
    /// GitHub login whose repositories are scanned
    #[arg(long, value_name = "LOGIN", env = "GITHUB_ACTOR")]
    pub user: Option<String>,

    /// GitHub access token with read access to the account's repositories
    #[arg(long, value_name = "TOKEN", env = "ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Where to write the SVG card
    #[arg(long, short = 'o', value_name = "PATH", default_value = "languages.svg")]
    pub output: Utf8PathBuf,

    /// Also write the ranking to a JSON file
    #[arg(long, value_name = "PATH")]
    pub json: Option<Utf8PathBuf>,

    /// Path to configuration file (default is `ghlangs.toml` in the current directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Hide languages below this percentage from the card (overrides the configuration file)
    #[arg(long, value_name = "PCT")]
    pub min_percentage: Option<f64>,

    /// GraphQL endpoint to query
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

pub async fn process_collect<H: Host>(host: &mut H, args: &CollectArgs) -> Result<()> {
    init_logging(args.log_level);

    let (login, token) = credentials(args)?;

    let mut config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    if let Some(min_percentage) = args.min_percentage {
        config.min_percentage = min_percentage;
        config.validate()?;
    }

    let client = Client::new(token, &args.api_url, config.request_timeout)?;
    let executor = Executor::new(client, config.retry_policy(), config.max_concurrent_requests);

    let delay = if args.log_level == LogLevel::None {
        Duration::from_millis(300)
    } else {
        Duration::from_secs(365 * 24 * 60 * 60)
    };
    let progress = ProgressReporter::new(delay, args.color.use_colors(&stderr()));

    let _ = writeln!(host.output(), "Starting GitHub language statistics collection for: {login}");
    log::info!(target: LOG_TARGET, "Querying {}", args.api_url);

    let start = Instant::now();
    let collector = Collector::new(executor, login, config.page_limits(), Arc::new(progress));
    let aggregate = collector.run().await;
    if aggregate.processed() == 0 {
        let _ = writeln!(host.error(), "No language data was collected for '{login}', the card will be empty");
    }
    let shares = rank(&aggregate);

    let mut svg = String::new();
    generate_svg(&shares, &config.svg_options(), &mut svg)?;
    fs::write(&args.output, svg).into_app_err_with(|| format!("writing SVG to '{}'", args.output))?;
    let _ = writeln!(host.output(), "\nSVG generated: {}", args.output);

    if let Some(path) = &args.json {
        let mut json = String::new();
        generate_json(login, &aggregate, &shares, &mut json)?;
        fs::write(path, json).into_app_err_with(|| format!("writing JSON report to '{path}'"))?;
        let _ = writeln!(host.output(), "JSON report generated: {path}");
    }

    let mut console = String::new();
    generate_console(&aggregate, &shares, config.min_percentage, args.color.use_colors(&stdout()), &mut console)?;
    let _ = writeln!(host.output());
    let _ = write!(host.output(), "{console}");

    let _ = writeln!(host.output(), "\nCompleted in {:.2} seconds", start.elapsed().as_secs_f64());
    Ok(())
}

/// Pick the login and token, rejecting missing values and unedited placeholders.
fn credentials(args: &CollectArgs) -> Result<(&str, &str)> {
    let login = args.user.as_deref().map(str::trim).unwrap_or_default();
    let token = args.token.as_deref().map(str::trim).unwrap_or_default();

    if login.is_empty() {
        bail!("no GitHub user given, use --user or set GITHUB_ACTOR");
    }

    if token.is_empty() {
        bail!("no access token given, use --token or set ACCESS_TOKEN");
    }

    if login == USER_PLACEHOLDER || token == TOKEN_PLACEHOLDER {
        bail!("replace the '{USER_PLACEHOLDER}' and '{TOKEN_PLACEHOLDER}' placeholders with a real GitHub user and access token");
    }

    Ok((login, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(user: Option<&str>, token: Option<&str>) -> CollectArgs {
        CollectArgs {
            user: user.map(str::to_string),
            token: token.map(str::to_string),
            output: Utf8PathBuf::from("languages.svg"),
            json: None,
            config: None,
            min_percentage: None,
            api_url: DEFAULT_API_URL.to_string(),
            color: ColorMode::Never,
            log_level: LogLevel::None,
        }
    }

    #[test]
    fn test_credentials_accepted() {
        let args = args(Some(" octocat "), Some("ghp_abc"));
        assert_eq!(credentials(&args).unwrap(), ("octocat", "ghp_abc"));
    }

    #[test]
    fn test_missing_user_rejected() {
        let err = credentials(&args(None, Some("ghp_abc"))).unwrap_err();
        assert!(err.to_string().contains("GITHUB_ACTOR"));
    }

    #[test]
    fn test_missing_token_rejected() {
        let err = credentials(&args(Some("octocat"), Some("  "))).unwrap_err();
        assert!(err.to_string().contains("ACCESS_TOKEN"));
    }

    #[test]
    fn test_placeholders_rejected() {
        let _ = credentials(&args(Some("<username>"), Some("ghp_abc"))).unwrap_err();
        let _ = credentials(&args(Some("octocat"), Some("<token>"))).unwrap_err();
    }

    #[test]
    fn test_parse_defaults() {
        let args = CollectArgs::try_parse_from(["collect", "--user", "octocat", "--token", "t"]).unwrap();
        assert_eq!(args.output, "languages.svg");
        assert_eq!(args.api_url, "https://api.github.com/graphql");
        assert_eq!(args.log_level, LogLevel::None);
        assert_eq!(args.color, ColorMode::Auto);
        assert!(args.min_percentage.is_none());
    }
}
