#![deny(missing_docs)]
//! RepoGrade core library.
//!
//! This crate contains the domain types and the scoring engine that turns
//! repository metadata into a score, a breakdown, a summary and a roadmap.
//! It performs no I/O; callers fetch the metadata and hand it in.

pub mod analyzer;
pub mod clock;
pub mod domain;
pub mod error;
pub mod locator;
pub mod report;
pub mod roadmap;
pub mod scoring;
pub mod summary;

pub use analyzer::{Analyzer, analyze};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    AnalysisResult, COMMIT_PAGE_SIZE, Category, CategoryResult, CategoryStatus, CommitRecord,
    DirectoryEntry, EntryKind, Level, Priority, RepositoryAttributes, RepositoryInfo, RoadmapItem,
    coerce_commits, coerce_listing,
};
pub use error::{RepoGradeError, Result};
pub use locator::{LocatorError, RepoLocator};
pub use report::{AnalysisReport, RepoReport, ReportStatus, render_json, render_markdown};
pub use roadmap::{ROADMAP_LIMIT, generate_roadmap};
pub use scoring::calculate_level;
pub use summary::generate_summary;
