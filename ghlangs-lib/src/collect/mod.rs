//! Paginated language collection from the GitHub GraphQL API
//!
//! This module gathers the per-language byte counts of every repository an account owns
//! or has contributed to, and folds them into one [`Aggregate`].
//!
//! # Implementation Model
//!
//! The pipeline is layered, leaf first:
//!
//! - **[`Executor`]**: issues one GraphQL query through a [`Throttler`] (bounded
//!   concurrency plus a smoothing delay) and applies a [`RetryPolicy`]. It never fails:
//!   once attempts are exhausted it hands back an empty [`Response`].
//! - **[`paginate`]**: drives cursor-based iteration over one [`QueryFamily`], calling
//!   back once per repository node and stopping gracefully when a page carries no data.
//! - **[`Aggregate`]**: folds repository nodes into language records and remembers which
//!   repositories were already seen.
//! - **[`Collector`]**: runs the owned-repository pass, then the contributed-repository
//!   pass, skipping contributed repositories that the first pass already saw.
//!
//! All waiting goes through a [`Sleeper`] so the retry schedule can be exercised in tests
//! without real delays.

mod aggregate;
mod client;
mod collector;
mod executor;
mod model;
mod paginator;
mod progress;
mod query;
mod retry;
mod sleeper;
mod throttler;

pub use aggregate::{Aggregate, DEFAULT_LANGUAGE_COLOR, FoldOutcome, LanguageRecord, PassSummary};
pub use client::{Client, DEFAULT_API_URL};
pub use collector::Collector;
pub use executor::Executor;
pub use model::{ApiError, Language, LanguageConnection, LanguageEdge, Owner, PageInfo, RepositoryConnection, RepositoryNode, Response, UserData, UserRepositories};
pub use paginator::{PageLimits, PageStats, StopReason, paginate};
pub use progress::{NoProgress, Progress};
pub use query::{PageRequest, QueryFamily};
pub use retry::{Decision, Failure, RetryPolicy};
pub use sleeper::{Sleeper, TokioSleeper};
pub use throttler::Throttler;
