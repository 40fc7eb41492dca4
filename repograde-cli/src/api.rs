//! RepoGrade server client for the CLI.

use crate::CliResult;
use clap::Args;
use repograde_core::AnalysisReport;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// CLI arguments for reaching the RepoGrade server.
#[derive(Args, Clone, Debug)]
pub struct ServerArgs {
    /// Base URL of the RepoGrade server.
    #[arg(long, env = "REPOGRADE_API_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP client abstraction for repository analysis.
pub trait AnalysisClient {
    /// Ask the server to analyze one repository URL.
    fn analyze<'a>(
        &'a self,
        repo_url: &'a str,
    ) -> Pin<Box<dyn Future<Output = CliResult<AnalysisReport>> + Send + 'a>>;
}

/// Reqwest-backed analysis client.
#[cfg_attr(test, allow(dead_code))]
pub struct ReqwestAnalysisClient {
    client: Client,
    server_url: String,
}

impl ReqwestAnalysisClient {
    /// Build a client for the given server.
    #[cfg_attr(test, allow(dead_code))]
    pub fn new(args: &ServerArgs) -> CliResult<Self> {
        let server_url = normalize_server_url(&args.server_url)?;
        let client = Client::builder().user_agent("repograde-cli").build()?;
        Ok(Self { client, server_url })
    }
}

impl AnalysisClient for ReqwestAnalysisClient {
    fn analyze<'a>(
        &'a self,
        repo_url: &'a str,
    ) -> Pin<Box<dyn Future<Output = CliResult<AnalysisReport>> + Send + 'a>> {
        Box::pin(request_analysis(&self.client, &self.server_url, repo_url))
    }
}

/// Normalize the server URL by trimming whitespace and trailing slashes.
pub(crate) fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// POST the repository URL to the server and decode the report.
#[cfg_attr(test, allow(dead_code))]
async fn request_analysis(
    client: &Client,
    server_url: &str,
    repo_url: &str,
) -> CliResult<AnalysisReport> {
    let response = client
        .post(format!("{server_url}/api/analyze"))
        .json(&AnalyzeRequest { url: repo_url })
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_message(status.as_u16(), &body).into());
    }
    Ok(response.json::<AnalysisReport>().await?)
}

/// Prefer the server's `error` field; fall back to the raw status.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|payload| payload.error)
        .unwrap_or_else(|_| format!("server returned status {status}"))
}
