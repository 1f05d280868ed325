use super::model::RepositoryNode;
use super::paginator::{PageStats, StopReason};
use super::query::QueryFamily;
use crate::{HashMap, HashSet};

const LOG_TARGET: &str = " aggregate";

/// Color used for languages the API reports without one.
pub const DEFAULT_LANGUAGE_COLOR: &str = "#858585";

/// Cumulative statistics for one language.
#[derive(Debug, Clone)]
pub struct LanguageRecord {
    pub name: String,
    pub size: u64,
    pub color: String,
    pub repositories: HashSet<String>,
}

/// What [`Aggregate::fold`] did with a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    /// The repository is empty; nothing was recorded, not even the identifier.
    SkippedEmpty,

    /// The repository reports no language bytes. It is remembered as seen but contributes nothing.
    NoLanguageData,

    /// The repository's language edges were added to the records.
    Folded,
}

/// Per-family account of one collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub family: QueryFamily,
    pub pages: u32,
    pub nodes: u64,
    pub folded: u64,
    pub skipped_duplicates: u64,
    pub stop: StopReason,
}

impl PassSummary {
    #[must_use]
    pub const fn new(stats: PageStats, folded: u64, skipped_duplicates: u64) -> Self {
        Self {
            family: stats.family,
            pages: stats.pages,
            nodes: stats.nodes,
            folded,
            skipped_duplicates,
            stop: stats.stop,
        }
    }
}

/// Language totals for one collection run, together with the set of repositories already seen.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    records: Vec<LanguageRecord>,
    index: HashMap<String, usize>,
    seen: HashSet<String>,
    found: u64,
    processed: u64,
    private: u64,
    forks: u64,
    passes: Vec<PassSummary>,
}

impl Aggregate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one repository into the language records.
    ///
    /// Folding does not consult the seen set; folding the same repository twice counts it twice.
    pub fn fold(&mut self, repo: &RepositoryNode) -> FoldOutcome {
        if repo.is_empty {
            log::debug!(target: LOG_TARGET, "Skipping empty repository {}", repo.name_with_owner);
            return FoldOutcome::SkippedEmpty;
        }

        if self.seen.insert(repo.name_with_owner.clone()) {
            self.found += 1;
        }

        if repo.total_size() == 0 {
            log::debug!(target: LOG_TARGET, "No language data for {}", repo.name_with_owner);
            return FoldOutcome::NoLanguageData;
        }

        for (language, size) in repo.edges() {
            let idx = match self.index.get(&language.name) {
                Some(&idx) => idx,
                None => {
                    let color = language
                        .color
                        .as_deref()
                        .filter(|c| !c.is_empty())
                        .unwrap_or(DEFAULT_LANGUAGE_COLOR)
                        .to_string();

                    self.records.push(LanguageRecord {
                        name: language.name.clone(),
                        size: 0,
                        color,
                        repositories: HashSet::default(),
                    });

                    let idx = self.records.len() - 1;
                    let _ = self.index.insert(language.name.clone(), idx);
                    idx
                }
            };

            let record = &mut self.records[idx];
            record.size += size;
            let _ = record.repositories.insert(repo.name_with_owner.clone());
        }

        self.processed += 1;
        if repo.is_private {
            self.private += 1;
        }
        if repo.is_fork {
            self.forks += 1;
        }

        log::trace!(target: LOG_TARGET, "Folded {} ({} bytes)", repo.name_with_owner, repo.total_size());
        FoldOutcome::Folded
    }

    /// Whether a repository with this `owner/name` identifier has already been seen.
    #[must_use]
    pub fn contains(&self, name_with_owner: &str) -> bool {
        self.seen.contains(name_with_owner)
    }

    /// Language records in first-encounter order.
    #[must_use]
    pub fn languages(&self) -> &[LanguageRecord] {
        &self.records
    }

    #[must_use]
    pub fn language(&self, name: &str) -> Option<&LanguageRecord> {
        self.index.get(name).map(|&idx| &self.records[idx])
    }

    /// Sum of all language sizes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }

    /// Number of distinct non-empty repositories seen.
    #[must_use]
    pub const fn found(&self) -> u64 {
        self.found
    }

    /// Number of repositories whose language data was folded.
    #[must_use]
    pub const fn processed(&self) -> u64 {
        self.processed
    }

    #[must_use]
    pub const fn private(&self) -> u64 {
        self.private
    }

    #[must_use]
    pub const fn forks(&self) -> u64 {
        self.forks
    }

    pub fn record_pass(&mut self, summary: PassSummary) {
        self.passes.push(summary);
    }

    #[must_use]
    pub fn passes(&self) -> &[PassSummary] {
        &self.passes
    }
}
