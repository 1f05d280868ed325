#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for ghlangs
//!
//! This library consolidates all functionality for the ghlangs tool, which totals the
//! languages used across every repository a GitHub account owns or has contributed to
//! and renders the result as an SVG card.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`collect`]: Paginated GraphQL collection and language aggregation
//! - [`reports`]: Percentage ranking, SVG card, console and JSON output

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

/// Hash map used for lookups where iteration order does not matter.
pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Hash set used for lookups where iteration order does not matter.
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod collect;
#[cfg(not(any(debug_assertions, test)))]
mod collect;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
