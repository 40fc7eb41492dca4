//! Templated narrative summary.
//!
//! The summary is built from a fixed rule table: one fragment per score
//! band, strongest and weakest category, language and star tier, joined in
//! a fixed order.

use std::cmp::Ordering;

use crate::domain::{CategoryResult, RepositoryAttributes};

/// Build the narrative paragraph for an analysis.
pub fn generate_summary(
    attributes: &RepositoryAttributes,
    score: u32,
    breakdown: &[CategoryResult],
) -> String {
    let name = attributes.name.as_deref().unwrap_or("the repository");
    let owner = attributes.owner_login.as_deref().unwrap_or("Unknown");
    let (opening, tone) = score_band(score, name, owner);

    let mut summary = opening;
    if let Some(strongest) = strongest_category(breakdown) {
        summary.push_str(&format!(
            " Your strongest area is **{}**, scoring {}/{}. ",
            strongest.name, strongest.score, strongest.max
        ));
    }
    if let Some(weakest) = weakest_category(breakdown) {
        summary.push_str(&format!(
            " The main area for improvement is **{}**.",
            weakest.name
        ));
    }
    summary.push_str(language_advice(attributes.language.as_deref()));
    summary.push_str(&star_advice(attributes.stargazers_count));
    summary.push(' ');
    summary.push_str(tone);
    summary
}

/// First category with the highest `score / max` ratio.
pub fn strongest_category(breakdown: &[CategoryResult]) -> Option<&CategoryResult> {
    breakdown.iter().fold(None, |best, candidate| match best {
        Some(best) if compare_ratio(candidate, best) != Ordering::Greater => Some(best),
        _ => Some(candidate),
    })
}

/// First category with the lowest `score / max` ratio.
pub fn weakest_category(breakdown: &[CategoryResult]) -> Option<&CategoryResult> {
    breakdown.iter().fold(None, |worst, candidate| match worst {
        Some(worst) if compare_ratio(candidate, worst) != Ordering::Less => Some(worst),
        _ => Some(candidate),
    })
}

/// Order two categories by completion ratio without floating point.
pub(crate) fn compare_ratio(left: &CategoryResult, right: &CategoryResult) -> Ordering {
    let left_scaled = u64::from(left.score) * u64::from(right.max);
    let right_scaled = u64::from(right.score) * u64::from(left.max);
    left_scaled.cmp(&right_scaled)
}

fn score_band(score: u32, name: &str, owner: &str) -> (String, &'static str) {
    if score >= 85 {
        (
            format!(
                "🌟 **Impressive work!** {name} by {owner} demonstrates professional-grade development practices. "
            ),
            "This repository could serve as a model for other open-source projects.",
        )
    } else if score >= 70 {
        (
            format!("📈 **Solid foundation!** {name} shows good software engineering principles. "),
            "With some targeted improvements, this could become an exemplary repository.",
        )
    } else if score >= 50 {
        (
            format!("🚧 **Good start!** {name} has the basics in place. "),
            "Focus on the roadmap below to elevate your project quality.",
        )
    } else {
        (
            "🌱 **Getting started!** Every great project begins somewhere. ".to_string(),
            "Use this analysis as a guide for your development journey.",
        )
    }
}

fn language_advice(language: Option<&str>) -> &'static str {
    match language {
        Some("JavaScript") => {
            " As a JavaScript project, consider adding ESLint for code consistency and Prettier for formatting."
        }
        Some("Python") => {
            " For Python projects, adding type hints and using Black for code formatting would be beneficial."
        }
        Some("TypeScript") => {
            " TypeScript provides excellent type safety - ensure you're leveraging strict mode for maximum benefits."
        }
        _ => "",
    }
}

fn star_advice(stars: u64) -> String {
    if stars > 1000 {
        format!(
            " With {} stars, this project shows significant community interest.",
            group_thousands(stars)
        )
    } else if stars > 100 {
        format!(
            " The project has gained traction with {} stars.",
            group_thousands(stars)
        )
    } else {
        String::new()
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
