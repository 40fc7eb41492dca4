//! Report formatting utilities for RepoGrade outputs.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AnalysisResult, CategoryResult, RepositoryInfo, RoadmapItem};
use crate::error::Result;

/// Successful analysis payload, as returned by the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisReport {
    /// Always `success`.
    pub status: String,
    /// Score, breakdown, summary and roadmap.
    pub analysis: AnalysisResult,
    /// Display projection of the repository attributes.
    pub repository_info: RepositoryInfo,
}

impl AnalysisReport {
    /// Wrap a completed analysis.
    pub fn success(repository_info: RepositoryInfo, analysis: AnalysisResult) -> Self {
        Self {
            status: "success".to_string(),
            analysis,
            repository_info,
        }
    }
}

/// Outcome of analyzing one repository source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ReportStatus {
    /// Analysis completed.
    Analyzed,
    /// Analysis failed with an error message.
    Failed(String),
}

/// Analysis report for one repository source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoReport {
    /// Repository source (URL or file path).
    pub source: String,
    /// Outcome.
    pub status: ReportStatus,
    /// Analysis payload when the outcome is `Analyzed`.
    pub report: Option<AnalysisReport>,
}

impl RepoReport {
    /// Create a report for a completed analysis.
    pub fn analyzed(source: impl Into<String>, report: AnalysisReport) -> Self {
        Self {
            source: source.into(),
            status: ReportStatus::Analyzed,
            report: Some(report),
        }
    }

    /// Create a report for a failed analysis.
    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: ReportStatus::Failed(error.into()),
            report: None,
        }
    }
}

/// Render a list of repository reports as Markdown.
pub fn render_markdown(reports: &[RepoReport]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# RepoGrade Report\n");
    for report in reports {
        let _ = writeln!(output, "## {}\n", report.source);
        match (&report.status, &report.report) {
            (ReportStatus::Analyzed, Some(payload)) => append_analysis(&mut output, payload),
            (ReportStatus::Failed(error), _) => {
                let _ = writeln!(output, "- Status: failed ({error})\n");
            }
            (ReportStatus::Analyzed, None) => {
                let _ = writeln!(output, "- Status: analysis unavailable\n");
            }
        }
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}

fn append_analysis(output: &mut String, payload: &AnalysisReport) {
    let info = &payload.repository_info;
    let analysis = &payload.analysis;
    let _ = writeln!(output, "- Repository: {}/{}", info.owner, info.name);
    let _ = writeln!(output, "- Language: {}", info.language);
    let _ = writeln!(output, "- Stars: {}", info.stars);
    let _ = writeln!(
        output,
        "- Score: {}/100 ({})\n",
        analysis.score,
        analysis.level.as_str()
    );
    append_breakdown(output, &analysis.breakdown);
    let _ = writeln!(output, "### Summary\n{}\n", analysis.summary);
    append_roadmap(output, &analysis.roadmap);
}

fn append_breakdown(output: &mut String, breakdown: &[CategoryResult]) {
    let _ = writeln!(output, "### Breakdown");
    let _ = writeln!(output, "| Category | Score | Status | Notes |");
    let _ = writeln!(output, "| --- | --- | --- | --- |");
    for entry in breakdown {
        let _ = writeln!(
            output,
            "| {} | {}/{} | {} | {} |",
            entry.name,
            entry.score,
            entry.max,
            entry.status.as_str(),
            entry.message.replace('|', "\\|")
        );
    }
    let _ = writeln!(output);
}

fn append_roadmap(output: &mut String, roadmap: &[RoadmapItem]) {
    if roadmap.is_empty() {
        let _ = writeln!(output, "### Roadmap\nNo recommendations.\n");
        return;
    }
    let _ = writeln!(output, "### Roadmap");
    for (index, item) in roadmap.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. **[{}] {}**",
            index + 1,
            item.priority.as_str(),
            item.title
        );
        for step in &item.steps {
            let _ = writeln!(output, "   - {step}");
        }
    }
    let _ = writeln!(output);
}
