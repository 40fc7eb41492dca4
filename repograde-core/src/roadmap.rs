//! Improvement roadmap generation.

use crate::domain::{Category, CategoryResult, Priority, RepositoryAttributes, RoadmapItem};
use crate::summary::compare_ratio;

/// Maximum number of roadmap items returned.
pub const ROADMAP_LIMIT: usize = 4;

/// Build the ranked roadmap for a breakdown.
///
/// Categories under half of their maximum contribute their template, weakest
/// first. Two general blocks always follow, and the list is capped at
/// [`ROADMAP_LIMIT`]. Language and code quality have no template.
pub fn generate_roadmap(
    breakdown: &[CategoryResult],
    _attributes: &RepositoryAttributes,
) -> Vec<RoadmapItem> {
    let mut ranked: Vec<&CategoryResult> = breakdown.iter().collect();
    ranked.sort_by(|left, right| compare_ratio(left, right));

    let mut roadmap: Vec<RoadmapItem> = ranked
        .into_iter()
        .filter(|result| below_half(result))
        .filter_map(|result| result.category().and_then(category_template))
        .collect();

    roadmap.push(continuous_integration());
    roadmap.push(project_visibility());
    roadmap.truncate(ROADMAP_LIMIT);
    roadmap
}

fn below_half(result: &CategoryResult) -> bool {
    u64::from(result.score) * 2 < u64::from(result.max)
}

fn category_template(category: Category) -> Option<RoadmapItem> {
    let item = match category {
        Category::Readme => item(
            Priority::High,
            "Create comprehensive documentation",
            &[
                "Add a detailed README.md with project description",
                "Include installation instructions",
                "Add usage examples and API documentation",
                "Consider adding badges for build status, coverage, etc.",
            ],
        ),
        Category::Commits => item(
            Priority::High,
            "Improve commit practices",
            &[
                "Make smaller, more frequent commits",
                "Use conventional commit messages (feat:, fix:, docs:, etc.)",
                "Write descriptive commit messages that explain 'why' not just 'what'",
                "Consider using git hooks for consistency",
            ],
        ),
        Category::Structure => item(
            Priority::Medium,
            "Organize project structure",
            &[
                "Create logical folders (src/, tests/, docs/, config/)",
                "Separate source code from configuration files",
                "Use consistent naming conventions",
                "Consider using a project template or generator",
            ],
        ),
        Category::Testing => item(
            Priority::High,
            "Add testing framework",
            &[
                "Choose a testing framework (Jest for JS, Pytest for Python, etc.)",
                "Add unit tests for critical functions",
                "Set up continuous integration to run tests automatically",
                "Add test coverage reporting",
            ],
        ),
        Category::Language | Category::Quality => return None,
    };
    Some(item)
}

fn continuous_integration() -> RoadmapItem {
    item(
        Priority::Medium,
        "Implement continuous integration",
        &[
            "Set up GitHub Actions or similar CI/CD pipeline",
            "Automate testing on pull requests",
            "Add automated dependency updates",
            "Set up automated builds and deployments",
        ],
    )
}

fn project_visibility() -> RoadmapItem {
    item(
        Priority::Low,
        "Enhance project visibility",
        &[
            "Add a LICENSE file if not present",
            "Create a CONTRIBUTING.md guide",
            "Add a CODE_OF_CONDUCT.md file",
            "Consider adding issue and pull request templates",
        ],
    )
}

fn item(priority: Priority, title: &str, steps: &[&str]) -> RoadmapItem {
    RoadmapItem {
        priority,
        title: title.to_string(),
        steps: steps.iter().map(|step| step.to_string()).collect(),
    }
}
