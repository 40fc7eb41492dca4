//! Aggregation of category scores into a complete analysis.

use crate::clock::{Clock, SystemClock};
use crate::domain::{
    AnalysisResult, Category, CategoryResult, CommitRecord, DirectoryEntry, RepositoryAttributes,
};
use crate::roadmap::generate_roadmap;
use crate::scoring::{
    calculate_level, check_code_quality, check_commit_history, check_language, check_readme,
    check_structure, check_tests,
};
use crate::summary::generate_summary;

/// Scores repositories against the rubric using an injected clock.
pub struct Analyzer<C: Clock> {
    clock: C,
}

impl Analyzer<SystemClock> {
    /// Create an analyzer that reads the system time.
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Analyzer<C> {
    /// Create an analyzer with a custom clock.
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Analyze a repository.
    ///
    /// `commits` and `listing` are `None` when the upstream payload was not a
    /// list; the affected categories then fall back to their zero branch.
    pub fn analyze(
        &self,
        attributes: &RepositoryAttributes,
        commits: Option<&[CommitRecord]>,
        listing: Option<&[DirectoryEntry]>,
    ) -> AnalysisResult {
        let now = self.clock.now();
        let scores = [
            (Category::Readme, check_readme(listing)),
            (Category::Commits, check_commit_history(commits)),
            (Category::Structure, check_structure(listing)),
            (Category::Language, check_language(attributes)),
            (Category::Testing, check_tests(listing)),
            (Category::Quality, check_code_quality(attributes, now)),
        ];

        let breakdown: Vec<CategoryResult> = scores
            .into_iter()
            .map(|(category, (score, message))| CategoryResult::new(category, score, message))
            .collect();

        let total: u32 = breakdown.iter().map(|result| result.score).sum();
        let total = total.clamp(0, 100);
        let (level, level_color) = calculate_level(total);

        let summary = generate_summary(attributes, total, &breakdown);
        let roadmap = generate_roadmap(&breakdown, attributes);

        AnalysisResult {
            score: total,
            level,
            level_color: level_color.to_string(),
            breakdown,
            summary,
            roadmap,
        }
    }
}

/// Analyze a repository against the current system time.
pub fn analyze(
    attributes: &RepositoryAttributes,
    commits: Option<&[CommitRecord]>,
    listing: Option<&[DirectoryEntry]>,
) -> AnalysisResult {
    Analyzer::system().analyze(attributes, commits, listing)
}
