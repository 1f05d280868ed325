use super::executor::Executor;
use super::model::{RepositoryNode, Response, UserData};
use super::query::{PageRequest, QueryFamily};
use super::sleeper::Sleeper;
use strum::Display;

const LOG_TARGET: &str = " paginator";

const DEFAULT_PAGE_SIZE: u8 = 100;
const DEFAULT_LANGUAGES_PER_REPOSITORY: u8 = 50;
const DEFAULT_MAX_PAGES: u32 = 1000;

/// Page sizing and safety limits for one pagination run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Repositories requested per page (the API caps this at 100).
    pub page_size: u8,

    /// Language edges requested per repository.
    pub languages_per_repository: u8,

    /// Hard stop on the number of pages fetched for one family.
    pub max_pages: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            languages_per_repository: DEFAULT_LANGUAGES_PER_REPOSITORY,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Why pagination of a family ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StopReason {
    /// The last page reported no further pages.
    #[strum(to_string = "all pages read")]
    Exhausted,

    /// A page came back without `data.user`, including the executor's empty result.
    #[strum(to_string = "no data returned")]
    NoData,

    /// A page claimed more pages but carried no end cursor.
    #[strum(to_string = "missing end cursor")]
    MissingCursor,

    /// The page limit was reached.
    #[strum(to_string = "page limit reached")]
    PageLimit,
}

/// Outcome of paging through one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStats {
    pub family: QueryFamily,
    pub pages: u32,
    pub nodes: u64,
    pub stop: StopReason,
}

/// Page through `family` for `login`, calling `on_repository` for every repository node.
///
/// Nodes are delivered in page order. A page without the expected data ends the stream
/// quietly; whatever was delivered before stays delivered.
pub async fn paginate<S, F>(executor: &Executor<S>, family: QueryFamily, login: &str, limits: &PageLimits, mut on_repository: F) -> PageStats
where
    S: Sleeper,
    F: FnMut(RepositoryNode),
{
    let mut cursor: Option<String> = None;
    let mut stats = PageStats {
        family,
        pages: 0,
        nodes: 0,
        stop: StopReason::Exhausted,
    };

    loop {
        if stats.pages >= limits.max_pages {
            log::warn!(target: LOG_TARGET, "Stopping {family} after {} page(s), the configured maximum", stats.pages);
            stats.stop = StopReason::PageLimit;
            break;
        }

        let request = PageRequest::new(family, login, cursor.as_deref(), limits.page_size, limits.languages_per_repository);
        log::debug!(target: LOG_TARGET, "Fetching {family} page {} (cursor {:?})", stats.pages + 1, request.cursor());

        let response: Response<UserData> = executor.execute(&request).await;
        let Some(user) = response.data.and_then(|data| data.user) else {
            log::info!(target: LOG_TARGET, "No more {family} data available");
            stats.stop = StopReason::NoData;
            break;
        };

        stats.pages += 1;
        let connection = user.repos;

        for node in connection.nodes.into_iter().flatten() {
            stats.nodes += 1;
            on_repository(node);
        }

        if !connection.page_info.has_next_page {
            stats.stop = StopReason::Exhausted;
            break;
        }

        match connection.page_info.end_cursor {
            Some(next) => cursor = Some(next),
            None => {
                log::warn!(target: LOG_TARGET, "{family} page {} reported more pages without an end cursor", stats.pages);
                stats.stop = StopReason::MissingCursor;
                break;
            }
        }
    }

    log::debug!(
        target: LOG_TARGET,
        "Finished {family}: {} page(s), {} repositories ({})",
        stats.pages,
        stats.nodes,
        stats.stop
    );

    stats
}
