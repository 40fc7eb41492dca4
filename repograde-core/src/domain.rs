//! Domain entities for RepoGrade.
//!
//! Upstream hosting APIs return loosely shaped JSON. The constructors in this
//! module are the single place where that JSON is coerced into the strict
//! types the scoring engine works on; everything downstream is total over
//! these types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::{RepoGradeError, Result};

/// Number of commits requested from the hosting API per analysis.
pub const COMMIT_PAGE_SIZE: usize = 30;

/// Attributes describing a repository, as reported by the hosting API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryAttributes {
    /// Repository name.
    pub name: Option<String>,
    /// Login of the owning user or organization.
    pub owner_login: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Primary language detected by the host.
    pub language: Option<String>,
    /// Star count.
    pub stargazers_count: u64,
    /// Fork count.
    pub forks_count: u64,
    /// Repository size in kilobytes.
    pub size: u64,
    /// Whether the wiki is enabled.
    pub has_wiki: bool,
    /// Whether issues are enabled.
    pub has_issues: bool,
    /// Number of open issues.
    pub open_issues_count: u64,
    /// Creation timestamp as sent by the host.
    pub created_at: Option<String>,
    /// Last push timestamp as sent by the host.
    pub pushed_at: Option<String>,
}

impl RepositoryAttributes {
    /// Coerce a repository payload into attributes.
    ///
    /// The payload must be a JSON object. Missing or wrong-typed fields fall
    /// back to their defaults instead of failing.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            RepoGradeError::InvalidInput("repository payload is not an object".to_string())
        })?;

        Ok(Self {
            name: string_field(object, "name"),
            owner_login: object
                .get("owner")
                .and_then(Value::as_object)
                .and_then(|owner| string_field(owner, "login")),
            description: string_field(object, "description"),
            language: string_field(object, "language"),
            stargazers_count: count_field(object, "stargazers_count"),
            forks_count: count_field(object, "forks_count"),
            size: count_field(object, "size"),
            has_wiki: flag_field(object, "has_wiki"),
            has_issues: flag_field(object, "has_issues"),
            open_issues_count: count_field(object, "open_issues_count"),
            created_at: string_field(object, "created_at"),
            pushed_at: string_field(object, "pushed_at"),
        })
    }

    /// Description, if present and non-empty.
    pub fn description_text(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    /// Primary language, if present and non-empty.
    pub fn language_name(&self) -> Option<&str> {
        non_empty(self.language.as_deref())
    }
}

/// A single commit record. Only the count of records matters to scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit hash, when the host reported one.
    pub sha: Option<String>,
}

/// Kind of a directory listing entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symlinks, submodules and anything else.
    #[serde(other)]
    Other,
}

/// Entry of the repository root listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// File or folder name.
    pub name: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    /// Create a directory entry.
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let kind = match object.get("type").and_then(Value::as_str) {
            Some("file") => EntryKind::File,
            Some("dir") => EntryKind::Dir,
            _ => EntryKind::Other,
        };
        Self {
            name: string_field(object, "name").unwrap_or_default(),
            kind,
        }
    }
}

/// Coerce a commit payload. Returns `None` when the payload is not a list.
///
/// Every element counts as one commit; `sha` is read only from objects.
pub fn coerce_commits(value: &Value) -> Option<Vec<CommitRecord>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| CommitRecord {
                sha: item
                    .as_object()
                    .and_then(|object| string_field(object, "sha")),
            })
            .collect(),
    )
}

/// Coerce a directory listing payload. Returns `None` when the payload is not
/// a list.
pub fn coerce_listing(value: &Value) -> Option<Vec<DirectoryEntry>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_object)
            .map(DirectoryEntry::from_object)
            .collect(),
    )
}

/// The six rubric categories, in breakdown order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// README presence.
    Readme,
    /// Commit history depth.
    Commits,
    /// Conventional top-level folders.
    Structure,
    /// Primary language.
    Language,
    /// Test folders or files.
    Testing,
    /// Composite quality signals.
    Quality,
}

impl Category {
    /// All categories in breakdown order.
    pub const ALL: [Category; 6] = [
        Category::Readme,
        Category::Commits,
        Category::Structure,
        Category::Language,
        Category::Testing,
        Category::Quality,
    ];

    /// Display name used in the breakdown.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Readme => "README Quality",
            Category::Commits => "Commit History",
            Category::Structure => "Repository Structure",
            Category::Language => "Languages Used",
            Category::Testing => "Testing",
            Category::Quality => "Code Quality",
        }
    }

    /// Maximum points available.
    pub fn max(&self) -> u32 {
        match self {
            Category::Readme | Category::Commits | Category::Testing => 20,
            Category::Structure | Category::Language => 15,
            Category::Quality => 10,
        }
    }

    /// Look up a category by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }

    /// Status reported for a score in this category.
    pub fn status_for(&self, score: u32) -> CategoryStatus {
        let (good_at, otherwise) = match self {
            Category::Readme => (10, CategoryStatus::NeedsWork),
            Category::Commits => (15, CategoryStatus::NeedsWork),
            Category::Structure => (10, CategoryStatus::NeedsWork),
            Category::Language => (10, CategoryStatus::NeedsWork),
            Category::Testing => (10, CategoryStatus::Missing),
            Category::Quality => (5, CategoryStatus::NeedsWork),
        };
        if score >= good_at {
            CategoryStatus::Good
        } else {
            otherwise
        }
    }
}

/// Status label for a category score.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryStatus {
    /// Category is in good shape.
    Good,
    /// Category needs attention.
    NeedsWork,
    /// Category is absent entirely.
    Missing,
}

impl CategoryStatus {
    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryStatus::Good => "good",
            CategoryStatus::NeedsWork => "needs-work",
            CategoryStatus::Missing => "missing",
        }
    }
}

/// Score report for one rubric category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResult {
    /// Category display name.
    pub name: String,
    /// Points earned.
    pub score: u32,
    /// Points available.
    pub max: u32,
    /// Status label.
    pub status: CategoryStatus,
    /// Human-readable explanation.
    pub message: String,
}

impl CategoryResult {
    /// Build a result for a category, deriving its status.
    pub fn new(category: Category, score: u32, message: impl Into<String>) -> Self {
        let score = score.min(category.max());
        Self {
            name: category.name().to_string(),
            score,
            max: category.max(),
            status: category.status_for(score),
            message: message.into(),
        }
    }

    /// Rubric category this result belongs to, if the name is recognized.
    pub fn category(&self) -> Option<Category> {
        Category::from_name(&self.name)
    }
}

/// Maturity level derived from the total score.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Level {
    /// Total below 60.
    Beginner,
    /// Total from 60 to 79.
    Intermediate,
    /// Total of 80 or more.
    Advanced,
}

impl Level {
    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    /// Display color associated with the level.
    pub fn color(&self) -> &'static str {
        match self {
            Level::Beginner => "#ff6b6b",
            Level::Intermediate => "#f8961e",
            Level::Advanced => "#4cc9f0",
        }
    }
}

/// Roadmap priority.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Address first.
    High,
    /// Address soon.
    Medium,
    /// Nice to have.
    Low,
}

impl Priority {
    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

/// Actionable improvement block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoadmapItem {
    /// Priority label.
    pub priority: Priority,
    /// Short title.
    pub title: String,
    /// Ordered steps.
    pub steps: Vec<String>,
}

/// Complete analysis of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    /// Total score, 0-100.
    pub score: u32,
    /// Maturity level.
    pub level: Level,
    /// Display color for the level.
    pub level_color: String,
    /// Per-category results in rubric order.
    pub breakdown: Vec<CategoryResult>,
    /// Narrative summary.
    pub summary: String,
    /// Ranked improvement roadmap, at most four items.
    pub roadmap: Vec<RoadmapItem>,
}

/// Display projection of repository attributes returned next to an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryInfo {
    /// Repository name.
    pub name: String,
    /// Owner login.
    pub owner: String,
    /// Description.
    pub description: String,
    /// Star count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Primary language.
    pub language: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last push timestamp.
    pub updated_at: String,
    /// Size in kilobytes.
    pub size: u64,
    /// Whether the wiki is enabled.
    pub has_wiki: bool,
    /// Whether issues are enabled.
    pub has_issues: bool,
    /// Open issue count.
    pub open_issues: u64,
}

impl From<&RepositoryAttributes> for RepositoryInfo {
    fn from(attributes: &RepositoryAttributes) -> Self {
        let or = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };
        Self {
            name: or(&attributes.name, "Unknown"),
            owner: or(&attributes.owner_login, "Unknown"),
            description: or(&attributes.description, "No description"),
            stars: attributes.stargazers_count,
            forks: attributes.forks_count,
            language: or(&attributes.language, "Not specified"),
            created_at: or(&attributes.created_at, "Unknown"),
            updated_at: or(&attributes.pushed_at, "Unknown"),
            size: attributes.size,
            has_wiki: attributes.has_wiki,
            has_issues: attributes.has_issues,
            open_issues: attributes.open_issues_count,
        }
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn count_field(object: &Map<String, Value>, key: &str) -> u64 {
    object.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn flag_field(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
