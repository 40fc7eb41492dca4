//! Category scorers and the level classifier.
//!
//! Each scorer is a total function over the strict input types. An
//! unavailable listing or commit list is a defined branch with its own
//! message, never an error.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{CommitRecord, DirectoryEntry, EntryKind, Level, RepositoryAttributes};

/// Score and explanation produced by a single scorer.
pub type Score = (u32, String);

const STANDARD_FOLDERS: [&str; 8] = [
    "src", "lib", "app", "public", "docs", "config", "assets", "static",
];

const MAINSTREAM_LANGUAGES: [&str; 7] = [
    "JavaScript",
    "Python",
    "Java",
    "TypeScript",
    "C++",
    "Go",
    "Rust",
];

const TEST_INDICATORS: [&str; 6] = ["test", "tests", "__tests__", "spec", "cypress", "jest"];

/// README presence, out of 20.
pub fn check_readme(listing: Option<&[DirectoryEntry]>) -> Score {
    let found = listing
        .unwrap_or_default()
        .iter()
        .any(|entry| entry.name.to_uppercase().starts_with("README"));
    if found {
        (20, "✅ README file found".to_string())
    } else {
        (0, "❌ No README file found".to_string())
    }
}

/// Commit history depth, out of 20.
pub fn check_commit_history(commits: Option<&[CommitRecord]>) -> Score {
    let count = commits.map(<[CommitRecord]>::len).unwrap_or(0);
    match count {
        0 => (0, "❌ No commits found".to_string()),
        20.. => (
            20,
            format!("✅ Excellent commit history ({count} recent commits)"),
        ),
        10.. => (15, format!("⚠️ Good commit history ({count} recent commits)")),
        5.. => (
            10,
            format!("⚠️ Moderate commit history ({count} recent commits)"),
        ),
        _ => (5, format!("❌ Limited commit history ({count} commits)")),
    }
}

/// Conventional top-level folders, out of 15.
pub fn check_structure(listing: Option<&[DirectoryEntry]>) -> Score {
    let Some(listing) = listing else {
        return (0, "❌ Unable to analyze structure".to_string());
    };

    let found = listing
        .iter()
        .filter(|entry| entry.kind == EntryKind::Dir)
        .filter(|entry| STANDARD_FOLDERS.contains(&entry.name.to_lowercase().as_str()))
        .count();

    match found {
        4.. => (15, format!("✅ Excellent structure ({found} key folders found)")),
        2.. => (10, format!("⚠️ Good structure ({found} key folders found)")),
        1 => (5, format!("⚠️ Basic structure ({found} key folder found)")),
        0 => (0, "❌ Poor structure (no standard folders)".to_string()),
    }
}

/// Primary language, out of 15.
pub fn check_language(attributes: &RepositoryAttributes) -> Score {
    match attributes.language_name() {
        None => (0, "❌ No primary language detected".to_string()),
        Some(language) if MAINSTREAM_LANGUAGES.contains(&language) => {
            (15, format!("✅ Mainstream language ({language})"))
        }
        Some(language) => (10, format!("⚠️ Using {language}")),
    }
}

/// Test folders or files, out of 20.
///
/// Entries are scanned in listing order and the first matching entry
/// decides: a matching folder scores 20, a matching file scores 15. File
/// names match when they start with an indicator or contain it between
/// dots, so `testdata.json` counts as a test file.
pub fn check_tests(listing: Option<&[DirectoryEntry]>) -> Score {
    let Some(listing) = listing else {
        return (0, "❌ Unable to check for tests".to_string());
    };

    for entry in listing {
        let name = entry.name.to_lowercase();
        match entry.kind {
            EntryKind::Dir => {
                if TEST_INDICATORS
                    .iter()
                    .any(|indicator| name.contains(indicator))
                {
                    return (20, format!("✅ Test folder found ({})", entry.name));
                }
            }
            EntryKind::File => {
                if TEST_INDICATORS.iter().any(|indicator| {
                    name.contains(&format!(".{indicator}.")) || name.starts_with(indicator)
                }) {
                    return (15, "⚠️ Test files found".to_string());
                }
            }
            EntryKind::Other => {}
        }
    }

    (0, "❌ No test structure found".to_string())
}

/// Composite quality signals, out of 10.
///
/// Combines description (2), wiki (2), push recency (3) and size (3).
pub fn check_code_quality(attributes: &RepositoryAttributes, now: DateTime<Utc>) -> Score {
    let mut score = 0;
    let mut messages: Vec<&str> = Vec::new();

    if attributes.description_text().is_some() {
        score += 2;
        messages.push("✓ Has description");
    } else {
        messages.push("✗ Missing description");
    }

    if attributes.has_wiki {
        score += 2;
        messages.push("✓ Wiki enabled");
    } else {
        messages.push("✗ No wiki");
    }

    if let Some(pushed_at) = attributes.pushed_at.as_deref().filter(|raw| !raw.is_empty()) {
        let (points, message) = recency(pushed_at, now);
        score += points;
        messages.push(message);
    }

    if attributes.size > 1000 {
        score += 3;
        messages.push("✓ Substantial codebase");
    } else if attributes.size > 100 {
        score += 2;
        messages.push("⚠️ Moderate size");
    } else {
        messages.push("✗ Small codebase");
    }

    (score, messages.join(" | "))
}

/// Map a total score to its level and display color.
pub fn calculate_level(score: u32) -> (Level, &'static str) {
    let level = if score >= 80 {
        Level::Advanced
    } else if score >= 60 {
        Level::Intermediate
    } else {
        Level::Beginner
    };
    (level, level.color())
}

fn recency(pushed_at: &str, now: DateTime<Utc>) -> (u32, &'static str) {
    let Some(pushed) = parse_timestamp(pushed_at) else {
        return (0, "⚠️ Could not parse update date");
    };
    let days = (now - pushed).num_days();
    if days < 30 {
        (3, "✓ Recently updated")
    } else if days < 90 {
        (2, "⚠️ Updated within 3 months")
    } else if days < 180 {
        (1, "⚠️ Updated within 6 months")
    } else {
        (0, "✗ Not updated recently")
    }
}

/// Parse an RFC 3339 timestamp; timestamps without an offset are read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
