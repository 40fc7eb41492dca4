#![deny(missing_docs)]
//! RepoGrade command-line interface.
//!
//! Scores GitHub repositories either through a RepoGrade server or offline
//! from saved GitHub API payloads.

mod api;

use api::{AnalysisClient, ServerArgs};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use repograde_core::{
    AnalysisReport, RepoReport, RepositoryAttributes, RepositoryInfo, ReportStatus, analyze,
    coerce_commits, coerce_listing, render_json, render_markdown,
};
use serde_json::Value;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "repograde", version, about = "RepoGrade CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(&["file", "url"])
))]
struct RepoSourceArgs {
    /// File containing repository URLs (one per line).
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Single repository URL to analyze.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args, Clone)]
struct ScoreArgs {
    /// Repository metadata as returned by `GET /repos/{owner}/{name}`.
    #[arg(long)]
    repo: PathBuf,
    /// Commit list as returned by `GET /repos/{owner}/{name}/commits`.
    #[arg(long)]
    commits: Option<PathBuf>,
    /// Root listing as returned by `GET /repos/{owner}/{name}/contents`.
    #[arg(long)]
    contents: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze repositories through a RepoGrade server.
    Analyze {
        #[command(flatten)]
        source: RepoSourceArgs,
        #[command(flatten)]
        server: ServerArgs,
        /// Maximum number of concurrent requests.
        #[arg(short = 'j', long, default_value_t = 5)]
        concurrency: usize,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Score a repository offline from saved GitHub API responses.
    Score {
        #[command(flatten)]
        inputs: ScoreArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            server,
            concurrency,
            report,
        } => {
            let source = resolve_source_args(&source)?;
            let client = Arc::new(api::ReqwestAnalysisClient::new(&server)?);
            run_analyze(source, client, concurrency, report).await?
        }
        Commands::Score { inputs, report } => {
            let result = score_files(&inputs).await?;
            emit_reports(&[result], &report).await?
        }
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

async fn run_analyze<C>(
    source: RepoSource,
    client: Arc<C>,
    concurrency: usize,
    report: OutputArgs,
) -> CliResult<()>
where
    C: AnalysisClient + Send + Sync + 'static,
{
    let urls = load_repo_sources(source).await?;
    if urls.is_empty() {
        println!("No repositories found to analyze.");
        return Ok(());
    }

    let reports = analyze_urls(urls, client, concurrency).await?;
    emit_reports(&reports, &report).await
}

/// Analyze every URL, at most `concurrency` at a time, keeping input order.
async fn analyze_urls<C>(
    urls: Vec<String>,
    client: Arc<C>,
    concurrency: usize,
) -> CliResult<Vec<RepoReport>>
where
    C: AnalysisClient + Send + Sync + 'static,
{
    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for (index, url) in urls.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let client = client.clone();
        tasks.spawn(async move {
            let _permit = permit;
            (index, analyze_url(client.as_ref(), url).await)
        });
    }

    let mut reports = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(entry) => reports.push(entry),
            Err(err) => reports.push((usize::MAX, report_from_task_error(err))),
        }
    }
    reports.sort_by_key(|(index, _)| *index);

    Ok(reports.into_iter().map(|(_, report)| report).collect())
}

async fn analyze_url<C: AnalysisClient + ?Sized>(client: &C, url: String) -> RepoReport {
    match client.analyze(&url).await {
        Ok(payload) => RepoReport::analyzed(url, payload),
        Err(err) => RepoReport::failed(url, err.to_string()),
    }
}

fn report_from_task_error(error: tokio::task::JoinError) -> RepoReport {
    RepoReport::failed("unknown", error.to_string())
}

fn resolve_source_args(source: &RepoSourceArgs) -> CliResult<RepoSource> {
    if let Some(file) = source.file.clone() {
        return Ok(RepoSource::File(file));
    }
    if let Some(url) = source.url.clone() {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err("url cannot be empty".into());
        }
        return Ok(RepoSource::Url(trimmed.to_string()));
    }
    Err("no repository source provided".into())
}

async fn load_repo_urls(path: &Path) -> CliResult<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let urls = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok(urls)
}

async fn load_repo_sources(source: RepoSource) -> CliResult<Vec<String>> {
    match source {
        RepoSource::File(file) => load_repo_urls(&file).await,
        RepoSource::Url(url) => Ok(vec![url]),
    }
}

enum RepoSource {
    File(PathBuf),
    Url(String),
}

/// Score one repository from saved API payloads. A missing or non-list
/// commits/contents payload is treated as unavailable.
async fn score_files(inputs: &ScoreArgs) -> CliResult<RepoReport> {
    let repository = read_json(&inputs.repo).await?;
    let attributes = RepositoryAttributes::from_value(&repository)?;
    let commits = match &inputs.commits {
        Some(path) => coerce_commits(&read_json(path).await?),
        None => None,
    };
    let listing = match &inputs.contents {
        Some(path) => coerce_listing(&read_json(path).await?),
        None => None,
    };

    let analysis = analyze(&attributes, commits.as_deref(), listing.as_deref());
    let payload = AnalysisReport::success(RepositoryInfo::from(&attributes), analysis);
    Ok(RepoReport::analyzed(
        inputs.repo.display().to_string(),
        payload,
    ))
}

async fn read_json(path: &Path) -> CliResult<Value> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
    Ok(value)
}

async fn emit_reports(reports: &[RepoReport], output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_text(reports),
        OutputFormat::Markdown => render_markdown(reports),
        OutputFormat::Json => render_json(reports)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_text(reports: &[RepoReport]) -> String {
    let mut output = String::new();
    for report in reports {
        let _ = writeln!(output, "Source: {}", report.source);
        let payload = match (&report.status, &report.report) {
            (ReportStatus::Analyzed, Some(payload)) => payload,
            (ReportStatus::Failed(error), _) => {
                let _ = writeln!(output, "Status: failed ({error})");
                let _ = writeln!(output);
                continue;
            }
            (ReportStatus::Analyzed, None) => {
                let _ = writeln!(output, "Status: analysis unavailable");
                let _ = writeln!(output);
                continue;
            }
        };

        let info = &payload.repository_info;
        let analysis = &payload.analysis;
        let _ = writeln!(output, "Repository: {}/{}", info.owner, info.name);
        let _ = writeln!(
            output,
            "Score: {}/100 ({})",
            analysis.score,
            analysis.level.as_str()
        );
        let _ = writeln!(output, "Breakdown:");
        for entry in &analysis.breakdown {
            let _ = writeln!(
                output,
                "- {}: {}/{} [{}] {}",
                entry.name,
                entry.score,
                entry.max,
                entry.status.as_str(),
                entry.message
            );
        }
        let _ = writeln!(output, "Summary: {}", analysis.summary);

        if analysis.roadmap.is_empty() {
            let _ = writeln!(output, "Roadmap: none");
        } else {
            let _ = writeln!(output, "Roadmap:");
            for item in &analysis.roadmap {
                let _ = writeln!(output, "- [{}] {}", item.priority.as_str(), item.title);
                for step in &item.steps {
                    let _ = writeln!(output, "    * {step}");
                }
            }
        }

        let _ = writeln!(output);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{
        AnalysisClient, CliResult, OutputArgs, OutputFormat, RepoSource, RepoSourceArgs,
        ScoreArgs, analyze_urls, emit_reports, load_repo_sources, load_repo_urls, render_text,
        resolve_source_args, run_analyze, score_files,
    };
    use repograde_core::{
        AnalysisReport, CategoryStatus, Level, RepoReport, RepositoryAttributes, RepositoryInfo,
        ReportStatus, analyze,
    };
    use std::future::Future;
    use std::path::PathBuf;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct TestAnalysisClient {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl TestAnalysisClient {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnalysisClient for TestAnalysisClient {
        fn analyze<'a>(
            &'a self,
            repo_url: &'a str,
        ) -> Pin<Box<dyn Future<Output = CliResult<AnalysisReport>> + Send + 'a>> {
            Box::pin(async move {
                let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(current, Ordering::SeqCst);
                self.seen
                    .lock()
                    .expect("seen lock")
                    .push(repo_url.to_string());
                tokio::time::sleep(Duration::from_millis(10)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);

                if repo_url.contains("missing") {
                    return Err("Repository not found. GitHub says: Not Found".into());
                }
                Ok(sample_report(repo_url))
            })
        }
    }

    fn sample_report(url: &str) -> AnalysisReport {
        let name = url.rsplit('/').next().unwrap_or("demo").to_string();
        let attributes = RepositoryAttributes {
            name: Some(name),
            owner_login: Some("octo".to_string()),
            ..RepositoryAttributes::default()
        };
        let analysis = analyze(&attributes, None, None);
        AnalysisReport::success(RepositoryInfo::from(&attributes), analysis)
    }

    static UNIQUE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn unique_dir_name() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let counter = UNIQUE_COUNTER.fetch_add(1, Ordering::Relaxed);
        PathBuf::from(format!("repograde_cli_test_{nanos}_{counter}"))
    }

    #[test]
    fn resolve_source_prefers_file_over_url() {
        let args = RepoSourceArgs {
            file: Some(PathBuf::from("repos.txt")),
            url: Some("https://github.com/octo/demo".to_string()),
        };

        let source = resolve_source_args(&args).expect("source");
        match source {
            RepoSource::File(path) => assert_eq!(path, PathBuf::from("repos.txt")),
            RepoSource::Url(_) => panic!("expected file source"),
        }
    }

    #[test]
    fn resolve_source_trims_url() {
        let args = RepoSourceArgs {
            file: None,
            url: Some(" https://github.com/octo/demo ".to_string()),
        };

        let source = resolve_source_args(&args).expect("source");
        match source {
            RepoSource::Url(url) => assert_eq!(url, "https://github.com/octo/demo"),
            RepoSource::File(_) => panic!("expected url source"),
        }
    }

    #[test]
    fn resolve_source_errors_when_missing_or_empty() {
        let empty_url = RepoSourceArgs {
            file: None,
            url: Some("   ".to_string()),
        };
        assert!(resolve_source_args(&empty_url).is_err());

        let missing = RepoSourceArgs {
            file: None,
            url: None,
        };
        assert!(resolve_source_args(&missing).is_err());
    }

    #[tokio::test]
    async fn load_repo_urls_ignores_comments_and_blank_lines() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let file_path = root.join("repos.txt");
        std::fs::write(
            &file_path,
            "# comment\n\nhttps://github.com/octo/a\n  \nhttps://github.com/octo/b\n",
        )
        .expect("write repo list");

        let urls = load_repo_urls(&file_path).await.expect("urls");
        assert_eq!(
            urls,
            vec!["https://github.com/octo/a", "https://github.com/octo/b"]
        );

        let from_source = load_repo_sources(RepoSource::File(file_path))
            .await
            .expect("sources");
        assert_eq!(from_source.len(), 2);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn analyze_urls_keeps_order_and_bounds_concurrency() {
        let client = Arc::new(TestAnalysisClient::new());
        let urls: Vec<String> = (0..6)
            .map(|index| format!("https://github.com/octo/repo-{index}"))
            .collect();

        let reports = analyze_urls(urls.clone(), client.clone(), 2)
            .await
            .expect("reports");

        let sources: Vec<&str> = reports.iter().map(|report| report.source.as_str()).collect();
        assert_eq!(sources, urls.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(client.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(client.seen.lock().expect("seen lock").len(), 6);
        assert!(
            reports
                .iter()
                .all(|report| report.status == ReportStatus::Analyzed)
        );
    }

    #[tokio::test]
    async fn analyze_urls_records_failures_and_clamps_zero_concurrency() {
        let client = Arc::new(TestAnalysisClient::new());
        let urls = vec![
            "https://github.com/octo/demo".to_string(),
            "https://github.com/octo/missing".to_string(),
        ];

        let reports = analyze_urls(urls, client.clone(), 0).await.expect("reports");

        assert_eq!(client.peak.load(Ordering::SeqCst), 1);
        assert_eq!(reports[0].status, ReportStatus::Analyzed);
        assert_eq!(
            reports[1].status,
            ReportStatus::Failed("Repository not found. GitHub says: Not Found".to_string())
        );
        assert!(reports[1].report.is_none());
    }

    #[tokio::test]
    async fn run_analyze_writes_report_file() {
        let root = std::env::temp_dir().join(unique_dir_name());
        let output_path = root.join("out/report.json");
        let output = OutputArgs {
            format: OutputFormat::Json,
            report_output: Some(output_path.clone()),
        };

        run_analyze(
            RepoSource::Url("https://github.com/octo/demo".to_string()),
            Arc::new(TestAnalysisClient::new()),
            3,
            output,
        )
        .await
        .expect("run analyze");

        let contents = std::fs::read_to_string(&output_path).expect("read json");
        let parsed: serde_json::Value = serde_json::from_str(&contents).expect("parse");
        assert_eq!(parsed[0]["source"], "https://github.com/octo/demo");
        assert_eq!(parsed[0]["report"]["status"], "success");

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn score_files_analyzes_saved_payloads() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let repo_path = root.join("repo.json");
        let commits_path = root.join("commits.json");
        let contents_path = root.join("contents.json");
        std::fs::write(
            &repo_path,
            r#"{"name":"demo","owner":{"login":"octo"},"language":"Rust","stargazers_count":7}"#,
        )
        .expect("write repo");
        let commits: Vec<serde_json::Value> = (0..12)
            .map(|index| serde_json::json!({"sha": format!("c{index}")}))
            .collect();
        std::fs::write(
            &commits_path,
            serde_json::to_string(&commits).expect("commits json"),
        )
        .expect("write commits");
        std::fs::write(
            &contents_path,
            r#"[{"name":"README.md","type":"file"},{"name":"tests","type":"dir"}]"#,
        )
        .expect("write contents");

        let inputs = ScoreArgs {
            repo: repo_path.clone(),
            commits: Some(commits_path),
            contents: Some(contents_path),
        };
        let report = score_files(&inputs).await.expect("score");

        assert_eq!(report.source, repo_path.display().to_string());
        let payload = report.report.expect("payload");
        assert_eq!(payload.repository_info.owner, "octo");
        let breakdown = &payload.analysis.breakdown;
        assert_eq!(breakdown[0].score, 20);
        assert_eq!(breakdown[1].score, 15);
        assert_eq!(breakdown[3].score, 15);
        assert_eq!(breakdown[4].status, CategoryStatus::Good);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn score_files_treats_missing_lists_as_unavailable() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let repo_path = root.join("repo.json");
        std::fs::write(&repo_path, r#"{"name":"bare"}"#).expect("write repo");

        let inputs = ScoreArgs {
            repo: repo_path,
            commits: None,
            contents: None,
        };
        let report = score_files(&inputs).await.expect("score");
        let analysis = report.report.expect("payload").analysis;

        assert_eq!(analysis.breakdown[1].message, "❌ No commits found");
        assert_eq!(analysis.breakdown[2].message, "❌ Unable to analyze structure");
        assert_eq!(analysis.level, Level::Beginner);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn score_files_rejects_non_object_repository() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let repo_path = root.join("repo.json");
        std::fs::write(&repo_path, "[1, 2, 3]").expect("write repo");

        let inputs = ScoreArgs {
            repo: repo_path,
            commits: None,
            contents: None,
        };
        let err = score_files(&inputs).await.unwrap_err();
        assert!(err.to_string().contains("not an object"));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn score_files_reports_unreadable_input() {
        let inputs = ScoreArgs {
            repo: std::env::temp_dir()
                .join(unique_dir_name())
                .join("missing.json"),
            commits: None,
            contents: None,
        };
        let err = score_files(&inputs).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn render_text_covers_branches() {
        let reports = vec![
            RepoReport::analyzed(
                "https://github.com/octo/demo",
                sample_report("https://github.com/octo/demo"),
            ),
            RepoReport::failed("https://github.com/octo/missing", "not found"),
            RepoReport {
                source: "empty".to_string(),
                status: ReportStatus::Analyzed,
                report: None,
            },
        ];

        let output = render_text(&reports);
        assert!(output.contains("Source: https://github.com/octo/demo"));
        assert!(output.contains("Repository: octo/demo"));
        assert!(output.contains("- README Quality: 0/20 [needs-work] ❌ No README file found"));
        assert!(output.contains("Roadmap:\n- [HIGH]"));
        assert!(output.contains("Status: failed (not found)"));
        assert!(output.contains("Status: analysis unavailable"));
    }

    #[tokio::test]
    async fn emit_reports_support_formats() {
        let root = std::env::temp_dir().join(unique_dir_name());
        let reports = vec![RepoReport::failed("octo/demo", "boom")];

        let markdown_path = root.join("out/report.md");
        let output = OutputArgs {
            format: OutputFormat::Markdown,
            report_output: Some(markdown_path.clone()),
        };
        emit_reports(&reports, &output)
            .await
            .expect("emit markdown");
        let contents = std::fs::read_to_string(&markdown_path).expect("read markdown");
        assert!(contents.contains("# RepoGrade Report"));

        let text_path = root.join("out/report.txt");
        let output = OutputArgs {
            format: OutputFormat::Text,
            report_output: Some(text_path.clone()),
        };
        emit_reports(&reports, &output).await.expect("emit text");
        let contents = std::fs::read_to_string(&text_path).expect("read text");
        assert!(contents.contains("Status: failed (boom)"));

        let output = OutputArgs {
            format: OutputFormat::Json,
            report_output: None,
        };
        emit_reports(&reports, &output).await.expect("emit json");

        std::fs::remove_dir_all(&root).expect("cleanup");
    }
}
