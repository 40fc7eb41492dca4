//! GitHub REST API access for repository analysis.

use std::fmt;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use repograde_core::{
    COMMIT_PAGE_SIZE, CommitRecord, DirectoryEntry, RepoLocator, RepositoryAttributes,
    coerce_commits, coerce_listing,
};
use serde_json::Value;

/// GitHub API settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// GitHub API base URL.
    pub api_url: String,
    /// Optional token, used only to raise the anonymous rate limit.
    pub token: Option<String>,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl GitHubConfig {
    /// Build GitHub config from environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            user_agent: std::env::var("GITHUB_USER_AGENT")
                .unwrap_or_else(|_| "repograde-server".to_string()),
        }
    }

    fn repo_url(&self, locator: &RepoLocator) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url.trim_end_matches('/'),
            urlencoding::encode(&locator.owner),
            urlencoding::encode(&locator.name)
        )
    }
}

/// Errors raised while fetching repository data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be sent or the response could not be read.
    Transport(String),
    /// The repository lookup returned a non-success status.
    NotFound(String),
    /// The repository payload was not usable.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "github request failed: {message}"),
            Self::NotFound(message) => {
                write!(f, "Repository not found. GitHub says: {message}")
            }
            Self::Decode(message) => write!(f, "github response decode failed: {message}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Source of raw repository payloads.
pub trait RepositorySource {
    /// Fetch the repository metadata object.
    fn repository(&self, locator: &RepoLocator) -> Result<Value, FetchError>;
    /// Fetch the most recent page of commits.
    fn commits(&self, locator: &RepoLocator) -> Result<Value, FetchError>;
    /// Fetch the root directory listing.
    fn contents(&self, locator: &RepoLocator) -> Result<Value, FetchError>;
}

/// Blocking GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubApiClient {
    config: GitHubConfig,
    client: Client,
}

impl GitHubApiClient {
    /// Create a client. Must not be called from inside an async runtime.
    pub fn new(config: GitHubConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn get(&self, url: String) -> Result<Response, FetchError> {
        let mut request = self
            .client
            .get(url)
            .header("User-Agent", &self.config.user_agent)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .map_err(|err| FetchError::Transport(err.to_string()))
    }

    /// Fetch a list endpoint; non-success statuses read as an empty list.
    fn get_list(&self, url: String) -> Result<Value, FetchError> {
        let response = self.get(url)?;
        if !response.status().is_success() {
            log::warn!(
                "github list request returned {}; treating as empty",
                response.status()
            );
            return Ok(Value::Array(Vec::new()));
        }
        response
            .json()
            .map_err(|err| FetchError::Transport(err.to_string()))
    }
}

impl RepositorySource for GitHubApiClient {
    fn repository(&self, locator: &RepoLocator) -> Result<Value, FetchError> {
        let response = self.get(self.config.repo_url(locator))?;
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().unwrap_or(Value::Null);
            return Err(FetchError::NotFound(upstream_message(status, &body)));
        }
        response
            .json()
            .map_err(|err| FetchError::Decode(err.to_string()))
    }

    fn commits(&self, locator: &RepoLocator) -> Result<Value, FetchError> {
        self.get_list(format!(
            "{}/commits?per_page={COMMIT_PAGE_SIZE}",
            self.config.repo_url(locator)
        ))
    }

    fn contents(&self, locator: &RepoLocator) -> Result<Value, FetchError> {
        self.get_list(format!("{}/contents", self.config.repo_url(locator)))
    }
}

/// Strictly typed inputs for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSnapshot {
    /// Repository attributes.
    pub attributes: RepositoryAttributes,
    /// Recent commits, `None` when the payload was not a list.
    pub commits: Option<Vec<CommitRecord>>,
    /// Root listing, `None` when the payload was not a list.
    pub listing: Option<Vec<DirectoryEntry>>,
}

/// Fetch and coerce everything an analysis needs, in order: repository,
/// commits, contents.
pub fn fetch_snapshot<S: RepositorySource + ?Sized>(
    source: &S,
    locator: &RepoLocator,
) -> Result<RepoSnapshot, FetchError> {
    let repository = source.repository(locator)?;
    let attributes = RepositoryAttributes::from_value(&repository)
        .map_err(|err| FetchError::Decode(err.to_string()))?;
    let commits = source.commits(locator)?;
    let contents = source.contents(locator)?;

    Ok(RepoSnapshot {
        attributes,
        commits: coerce_commits(&commits),
        listing: coerce_listing(&contents),
    })
}

fn upstream_message(status: StatusCode, body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            log::debug!("github returned {status} without a message");
            "Unknown error".to_string()
        })
}
