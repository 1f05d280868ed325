//! Decoded GraphQL payloads.
//!
//! Both query families alias their repository connection to `repos`, so a single set of
//! types decodes either one.

use core::fmt;
use serde::Deserialize;

/// GraphQL response envelope.
///
/// The default value, with neither data nor errors, is the executor's empty result.
#[derive(Debug, Clone, Deserialize)]
pub struct Response<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<ApiError>>,
}

impl<T> Default for Response<T> {
    fn default() -> Self {
        Self { data: None, errors: None }
    }
}

impl<T> Response<T> {
    /// Returns `true` for the empty result.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_none() && self.errors.is_none()
    }
}

/// One entry of a GraphQL `errors` list.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{kind}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// `data` of a repository page query.
#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub user: Option<UserRepositories>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRepositories {
    pub repos: RepositoryConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub page_info: PageInfo,

    /// GraphQL allows null entries in node lists.
    #[serde(default)]
    pub nodes: Vec<Option<RepositoryNode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// A repository as reported by one page of either query family.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    /// `owner/name`, the identity used for deduplication.
    pub name_with_owner: String,

    #[serde(default)]
    pub is_private: bool,

    #[serde(default)]
    pub is_empty: bool,

    #[serde(default)]
    pub is_fork: bool,

    /// Only selected by the contributed-repositories family.
    #[serde(default)]
    pub owner: Option<Owner>,

    #[serde(default)]
    pub languages: Option<LanguageConnection>,
}

impl RepositoryNode {
    /// Total language size as reported by the API, independent of the edges.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.languages.as_ref().map_or(0, |l| l.total_size)
    }

    /// Language edges that carry a language node, in API order.
    pub fn edges(&self) -> impl Iterator<Item = (&Language, u64)> {
        self.languages
            .iter()
            .flat_map(|l| l.edges.iter().flatten())
            .filter_map(|edge| edge.node.as_ref().map(|node| (node, edge.size)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub login: String,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.login, self.typename)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConnection {
    #[serde(default)]
    pub edges: Vec<Option<LanguageEdge>>,

    #[serde(default)]
    pub total_size: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEdge {
    pub size: u64,
    pub node: Option<Language>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    pub name: String,
    pub color: Option<String>,
}
