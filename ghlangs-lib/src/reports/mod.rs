//! Report generation for collected language statistics
//!
//! # Implementation Model
//!
//! Every report starts from the same ranking: [`rank`] turns an [`Aggregate`] into a list
//! of [`LanguageShare`] values sorted by descending share. Three generators consume it,
//! each accessed through a `generate` function:
//! - **SVG**: the GitHub-style language card, with a light theme and a
//!   `#gh-dark-mode-only` dark variant
//! - **Console**: detailed statistics for the terminal, with optional ANSI colors
//! - **JSON**: machine-readable dump of the ranking
//!
//! Only the SVG and console generators apply the display threshold; the JSON dump
//! always carries every language.

mod console;
mod json;
mod svg;

use crate::collect::Aggregate;

pub use console::generate as generate_console;
pub use json::generate as generate_json;
pub use svg::{DEFAULT_MIN_PERCENTAGE, DEFAULT_TITLE, SvgOptions, generate as generate_svg};

/// One language's slice of the total size.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    pub color: String,
    pub size: u64,
    pub repositories: usize,
    pub percentage: f64,
}

/// Rank the languages of `aggregate` by descending share of the total size.
///
/// The sort is stable, so languages with equal shares keep their first-encounter order.
/// An aggregate with no bytes yields no shares.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "acceptable for percentages")]
pub fn rank(aggregate: &Aggregate) -> Vec<LanguageShare> {
    let total = aggregate.total_size();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<_> = aggregate
        .languages()
        .iter()
        .map(|record| LanguageShare {
            name: record.name.clone(),
            color: record.color.clone(),
            size: record.size,
            repositories: record.repositories.len(),
            percentage: record.size as f64 / total as f64 * 100.0,
        })
        .collect();

    shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    shares
}

/// Split `shares` into those shown on the card and those below `min_percentage`.
#[must_use]
pub fn partition_by_threshold(shares: &[LanguageShare], min_percentage: f64) -> (Vec<&LanguageShare>, Vec<&LanguageShare>) {
    shares.iter().partition(|share| share.percentage >= min_percentage)
}
