use std::fmt;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use crate::CommitRef;

pub const DEFAULT_WEBHOOK_URL: &str =
    "https://cloudbuild.googleapis.com/v1/projects/dcc-staging/triggers/Webhook:webhook";
pub const DEFAULT_REPOSITORY: &str = "GoogleChrome/developer.chrome.com";
pub const DEFAULT_CHECK_NAME: &str = "Build (dcc-staging)";

/// Webhook processing plus Cloud Build reporting the check back to GitHub
/// takes up to 1m30s; a full build takes around five minutes anyway.
pub const DEFAULT_PROPAGATION_DELAY: Duration = Duration::from_secs(150);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub key: String,
    pub secret: String,
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish()
    }
}

/// Everything a single staging run needs. Built once by the caller and handed
/// to the orchestrator; nothing below this reads the process environment.
#[derive(Clone, Debug)]
pub struct StageConfig {
    pub commit: CommitRef,
    /// The SHA GitHub Actions checked out. Only used for progress output.
    pub github_sha: Option<String>,
    pub webhook: WebhookConfig,
    pub github: GitHubConfig,
    pub check_name: String,
    pub propagation_delay: Duration,
    pub poll_interval: Duration,
    /// Upper bound on status polls. `None` waits for as long as the build takes.
    pub max_polls: Option<u32>,
}

impl StageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };
        let seconds = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(name) {
                Some(value) => parse_number::<u64>(name, value).map(Duration::from_secs),
                None => Ok(default),
            }
        };

        let repository = lookup("GITHUB_REPOSITORY").unwrap_or_else(|| DEFAULT_REPOSITORY.into());
        let (owner, repo) = split_repository(&repository)?;

        Ok(Self {
            commit: CommitRef::new(required("COMMIT_SHA")?),
            github_sha: lookup("GITHUB_SHA"),
            webhook: WebhookConfig {
                url: lookup("CLOUD_BUILD_WEBHOOK_URL").unwrap_or_else(|| DEFAULT_WEBHOOK_URL.into()),
                key: required("CLOUD_BUILD_KEY")?,
                secret: required("CLOUD_BUILD_SECRET")?,
            },
            github: GitHubConfig {
                token: required("GITHUB_TOKEN")?,
                owner,
                repo,
            },
            check_name: lookup("STAGE_CHECK_NAME").unwrap_or_else(|| DEFAULT_CHECK_NAME.into()),
            propagation_delay: seconds("STAGE_PROPAGATION_DELAY_SECS", DEFAULT_PROPAGATION_DELAY)?,
            poll_interval: seconds("STAGE_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL)?,
            max_polls: lookup("STAGE_MAX_POLLS")
                .map(|v| parse_number::<u32>("STAGE_MAX_POLLS", v))
                .transpose()?,
        })
    }
}

fn split_repository(repository: &str) -> Result<(String, String), ConfigError> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_owned(), repo.to_owned()))
        }
        _ => Err(ConfigError::InvalidRepository(repository.to_owned())),
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("`{0}` env variable missing")]
    #[diagnostic(help("this task is meant to run on GitHub Actions with the staging secrets set"))]
    MissingVar(&'static str),
    #[error("repository `{0}` is not in `owner/repo` form")]
    InvalidRepository(String),
    #[error("`{name}` must be a non-negative integer, got `{value}`")]
    InvalidNumber { name: &'static str, value: String },
}
