#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod style;

use clap::Parser;
use gpri_core::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECONDS};
use gpri_core::coordination::resolve_with;
use gpri_core::http::GitHubApiClient;
use gpri_core::output::{EnvExporter, EnvmanExporter, GithubOutputExporter, JsonExporter};
use gpri_core::{Error, OtherTitlesMode, PullRequestOutputs, Result, StepConfig};
use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "gpri",
    version,
    about = "Export the title, labels and number of the pull request behind a commit"
)]
struct Cli {
    /// GitHub user for basic auth
    #[arg(long, env = "github_username")]
    github_username: Option<String>,

    /// GitHub access token for basic auth
    #[arg(long, env = "github_access_token", hide_env_values = true)]
    github_access_token: Option<String>,

    /// Commit to find the merged pull request for
    #[arg(long, env = "commit_sha")]
    commit_sha: Option<String>,

    /// Repository URL ending in :<owner>/<repo>.git
    #[arg(long, env = "github_repository_url")]
    repository_url: Option<String>,

    /// "true" when the build runs for a pull request (logged only)
    #[arg(long, env = "is_PR")]
    is_pr: Option<String>,

    /// Pull request id of the build (logged only)
    #[arg(long, env = "pull_request_id")]
    pull_request_id: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[arg(long, env = "GPRI_HTTP_TIMEOUT_SECONDS")]
    http_timeout_seconds: Option<String>,

    /// Export target: envman, gha, json (default: auto-detect)
    #[arg(long = "export", env = "GPRI_EXPORT_TARGET")]
    export_target: Option<String>,

    /// Other titles source: documented or own
    #[arg(long, env = "GPRI_OTHER_TITLES_MODE")]
    other_titles_mode: Option<String>,

    /// Fail when no merge event matches the commit ("true" to enable)
    #[arg(long, env = "GPRI_REQUIRE_MATCH")]
    require_match: Option<String>,

    /// envman executable used by the envman export target
    #[arg(long, env = "GPRI_ENVMAN_PATH")]
    envman_path: Option<String>,
}

/// Where exported values are written
#[derive(Debug, Clone, Copy)]
enum ExportTarget {
    /// Bitrise: `envman add`
    Envman,
    /// GitHub Actions: append to $GITHUB_OUTPUT
    Gha,
    /// JSON object on stdout
    Json,
}

impl ExportTarget {
    fn detect(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some("envman") => Ok(ExportTarget::Envman),
            Some("gha") => Ok(ExportTarget::Gha),
            Some("json") => Ok(ExportTarget::Json),
            Some(other) => Err(Error::Config(format!(
                "Unknown export target: {} (expected envman, gha or json)",
                other
            ))),
            None => {
                if std::env::var("GITHUB_ACTIONS").is_ok() && std::env::var("GITHUB_OUTPUT").is_ok()
                {
                    Ok(ExportTarget::Gha)
                } else {
                    Ok(ExportTarget::Envman)
                }
            }
        }
    }

    fn exporter(&self, envman_path: Option<&str>) -> Result<Box<dyn EnvExporter>> {
        match self {
            ExportTarget::Envman => Ok(Box::new(match envman_path {
                Some(path) => EnvmanExporter::with_program(path),
                None => EnvmanExporter::new(),
            })),
            ExportTarget::Gha => match std::env::var("GITHUB_OUTPUT") {
                Ok(path) if !path.is_empty() => {
                    Ok(Box::new(GithubOutputExporter::open(&PathBuf::from(path))?))
                }
                _ => {
                    style::warn("Warning: GITHUB_OUTPUT not set, falling back to stdout");
                    Ok(Box::new(JsonExporter::new(std::io::stdout())))
                }
            },
            ExportTarget::Json => Ok(Box::new(JsonExporter::new(std::io::stdout()))),
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            style::fail(&e);
            e.exit_code()
        }
    };
    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

const DEFAULT_LOG_FILTER: &str = "gpri_core=warn,gpri=warn";

fn init_tracing() {
    let filter = std::env::var("GPRI_LOG")
        .ok()
        .filter(|v| !v.is_empty())
        .and_then(|v| tracing_subscriber::EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// Parse an optional boolean input; only "true" and "false" are accepted
fn parse_flag(name: &str, v: &Option<String>) -> Result<bool> {
    match clean_opt(v) {
        None | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(Error::Config(format!(
            "Invalid value for {}: {} (expected true or false)",
            name, other
        ))),
    }
}

fn parse_timeout(v: &Option<String>) -> Result<u64> {
    match clean_opt(v) {
        None => Ok(DEFAULT_TIMEOUT_SECONDS),
        Some(raw) => raw.trim().parse().map_err(|_| {
            Error::Config(format!(
                "Invalid value for GPRI_HTTP_TIMEOUT_SECONDS: {} (expected whole seconds)",
                raw
            ))
        }),
    }
}

fn run(cli: Cli) -> Result<()> {
    let is_pr = clean_opt(&cli.is_pr) == Some("true");
    let timeout_seconds = parse_timeout(&cli.http_timeout_seconds)?;
    let require_match = parse_flag("GPRI_REQUIRE_MATCH", &cli.require_match)?;
    let other_titles_mode = match clean_opt(&cli.other_titles_mode) {
        None => OtherTitlesMode::Documented,
        Some(raw) => OtherTitlesMode::parse(raw).ok_or_else(|| {
            Error::Config(format!(
                "Unknown other titles mode: {} (expected documented or own)",
                raw
            ))
        })?,
    };

    // Build StepConfig, borrowing from args (zero-copy)
    let config = StepConfig {
        github_username: Cow::Borrowed(clean_opt(&cli.github_username).unwrap_or("")),
        github_access_token: Cow::Borrowed(clean_opt(&cli.github_access_token).unwrap_or("")),
        commit_sha: Cow::Borrowed(clean_opt(&cli.commit_sha).unwrap_or("")),
        repository_url: Cow::Borrowed(clean_opt(&cli.repository_url).unwrap_or("")),
        is_pr,
        pull_request_id: clean_opt(&cli.pull_request_id).map(Cow::Borrowed),
        api_url: Cow::Borrowed(clean_opt(&cli.api_url).unwrap_or(DEFAULT_API_URL)),
        timeout_seconds,
        other_titles_mode,
        require_match,
    };

    style::info("Configs:");
    style::details(format_args!("github_username: {}", config.github_username));
    style::details("github_access_token: ***");
    style::details(format_args!("commit_sha: {}", config.commit_sha));
    style::details(format_args!("is_PR: {}", config.is_pr));
    style::details(format_args!(
        "pull_request_id: {}",
        config.pull_request_id.as_deref().unwrap_or("")
    ));
    style::details(format_args!("repository_url: {}", config.repository_url));

    config.validate()?;
    let repo = config.repository()?;
    let export_target = ExportTarget::detect(clean_opt(&cli.export_target))?;
    tracing::debug!(?export_target, timeout = config.timeout_seconds, "step configured");

    style::info(format_args!("Github repository is: {}", repo));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(format!("failed to create runtime: {}", e)))?;

    let client = GitHubApiClient::from_config(&config)?;
    let correlation = rt.block_on(resolve_with(
        &client,
        &repo,
        &config.commit_sha,
        config.other_titles_mode,
        config.require_match,
    ))?;

    let shown = correlation.matched.clone().unwrap_or_default();
    let dump = serde_json::to_string_pretty(&shown)
        .map_err(|e| Error::Runtime(format!("failed to render merge event: {}", e)))?;
    style::plain(dump);
    style::plain(&correlation.other_titles);

    if !correlation.is_match() {
        style::warn(format_args!(
            "No merge event found for commit {}, exporting empty values",
            config.commit_sha
        ));
    }

    let outputs = PullRequestOutputs::from_correlation(&correlation);
    let mut exporter = export_target.exporter(clean_opt(&cli.envman_path))?;

    style::info("Exporting outputs:");
    for (key, value) in outputs.entries() {
        exporter.export(key, value)?;
        style::done(key);
    }
    exporter.finish()?;

    Ok(())
}
