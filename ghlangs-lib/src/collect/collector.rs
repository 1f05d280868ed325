use super::aggregate::{Aggregate, FoldOutcome, PassSummary};
use super::executor::Executor;
use super::paginator::{PageLimits, paginate};
use super::progress::Progress;
use super::query::QueryFamily;
use super::sleeper::{Sleeper, TokioSleeper};
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use strum::IntoEnumIterator;

const LOG_TARGET: &str = " collector";

/// Collects language statistics for one account.
///
/// A run pages through the owned repositories first and the contributed repositories
/// second. A contributed repository already seen in the first pass is ignored, so data
/// from the account's own repositories always wins.
pub struct Collector<S = TokioSleeper> {
    executor: Executor<S>,
    login: String,
    limits: PageLimits,
    progress: Arc<dyn Progress>,
}

impl<S: Sleeper> Collector<S> {
    #[must_use]
    pub fn new(executor: Executor<S>, login: impl Into<String>, limits: PageLimits, progress: Arc<dyn Progress>) -> Self {
        Self {
            executor,
            login: login.into(),
            limits,
            progress,
        }
    }

    /// Run both passes and return the resulting aggregate.
    ///
    /// Every call starts from an empty aggregate.
    pub async fn run(&self) -> Aggregate {
        let mut aggregate = Aggregate::new();
        let seen = Arc::new(AtomicU64::new(0));

        for family in QueryFamily::iter() {
            let phase = match family {
                QueryFamily::Owned => "Owned",
                QueryFamily::Contributed => "Contributed",
            };
            self.progress.set_phase(phase);

            let counter = Arc::clone(&seen);
            self.progress
                .set_indeterminate(Box::new(move || format!("{} repositories scanned", counter.load(Ordering::Relaxed))));

            log::info!(target: LOG_TARGET, "Fetching {family} for '{}'", self.login);

            let mut folded = 0u64;
            let mut skipped_duplicates = 0u64;

            let stats = paginate(&self.executor, family, &self.login, &self.limits, |node| {
                let _ = seen.fetch_add(1, Ordering::Relaxed);

                if family == QueryFamily::Contributed && aggregate.contains(&node.name_with_owner) {
                    log::trace!(target: LOG_TARGET, "Skipping {}, already seen", node.name_with_owner);
                    skipped_duplicates += 1;
                    return;
                }

                if let Some(owner) = &node.owner {
                    log::trace!(target: LOG_TARGET, "Folding {} owned by {owner}", node.name_with_owner);
                }

                if aggregate.fold(&node) == FoldOutcome::Folded {
                    folded += 1;
                }
            })
            .await;

            log::info!(
                target: LOG_TARGET,
                "Done with {family}: {} page(s), {} repositories, {folded} folded, {skipped_duplicates} duplicate(s) skipped ({})",
                stats.pages,
                stats.nodes,
                stats.stop
            );

            aggregate.record_pass(PassSummary::new(stats, folded, skipped_duplicates));
        }

        self.progress.done();
        aggregate
    }
}

impl<S> core::fmt::Debug for Collector<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collector")
            .field("login", &self.login)
            .field("limits", &self.limits)
            .field("progress", &"<progress>")
            .finish_non_exhaustive()
    }
}
