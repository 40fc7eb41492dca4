//! Repository URL parsing.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RepoLocator {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

/// Reasons a repository URL could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorError {
    /// No URL was supplied.
    MissingUrl,
    /// The URL does not point at a GitHub repository.
    InvalidUrl,
}

impl fmt::Display for LocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "Please provide a GitHub URL"),
            Self::InvalidUrl => write!(f, "Invalid GitHub URL format"),
        }
    }
}

impl std::error::Error for LocatorError {}

impl RepoLocator {
    /// Parse `github.com/{owner}/{name}` out of a URL.
    ///
    /// The pattern may appear anywhere in the input, so scheme-less URLs and
    /// deep links into a repository are accepted. A trailing `.git` is
    /// removed from the name.
    pub fn parse(url: &str) -> Result<Self, LocatorError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LocatorError::MissingUrl);
        }

        let captures = github_pattern()
            .and_then(|pattern| pattern.captures(url))
            .ok_or(LocatorError::InvalidUrl)?;
        let owner = captures[1].to_string();
        let name = &captures[2];
        let name = name.strip_suffix(".git").unwrap_or(name).to_string();

        Ok(Self { owner, name })
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn github_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"github\.com/([^/]+)/([^/]+)").ok())
        .as_ref()
}
