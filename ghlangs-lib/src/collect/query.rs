//! Templated GraphQL queries for the two repository families.
//!
//! Both families share one page template. They differ only in the connection being
//! paged, its filter arguments, and the extra fields selected on each node.

use serde::Serialize;
use strum::{Display, EnumIter};

/// A stream of repositories that can be paged through for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum QueryFamily {
    /// Repositories owned by the account, private ones included, most recently updated first.
    #[strum(to_string = "owned repositories")]
    Owned,

    /// Repositories the account committed to, opened issues or pull requests in, or reviewed.
    /// The account's own repositories are excluded.
    #[strum(to_string = "contributed repositories")]
    Contributed,
}

struct Fragments {
    connection: &'static str,
    arguments: &'static str,
    node_fields: &'static str,
}

impl QueryFamily {
    const fn fragments(self) -> Fragments {
        match self {
            Self::Owned => Fragments {
                connection: "repositories",
                arguments: "orderBy: {field: UPDATED_AT, direction: DESC}",
                node_fields: "",
            },
            Self::Contributed => Fragments {
                connection: "repositoriesContributedTo",
                arguments: "includeUserRepositories: false, contributionTypes: [COMMIT, PULL_REQUEST, ISSUE, PULL_REQUEST_REVIEW]",
                node_fields: "\n        owner {\n          __typename\n          login\n        }",
            },
        }
    }

    /// GraphQL document for one page of this family.
    ///
    /// The connection is aliased to `repos` so both families decode into the same shape.
    #[must_use]
    pub fn query_text(self) -> String {
        let Fragments {
            connection,
            arguments,
            node_fields,
        } = self.fragments();

        format!(
            r"query($login: String!, $cursor: String, $pageSize: Int!, $languageCount: Int!) {{
  user(login: $login) {{
    repos: {connection}(
      first: $pageSize,
      after: $cursor,
      {arguments}
    ) {{
      pageInfo {{
        hasNextPage
        endCursor
      }}
      nodes {{
        nameWithOwner
        isPrivate
        isEmpty
        isFork{node_fields}
        languages(first: $languageCount, orderBy: {{field: SIZE, direction: DESC}}) {{
          edges {{
            size
            node {{
              name
              color
            }}
          }}
          totalSize
        }}
      }}
    }}
  }}
}}"
        )
    }
}

/// Request body for one page of a query family.
#[derive(Debug, Clone, Serialize)]
pub struct PageRequest {
    query: String,
    variables: Variables,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables {
    login: String,
    cursor: Option<String>,
    page_size: u8,
    language_count: u8,
}

impl PageRequest {
    /// Build the request for the page after `cursor`, or the first page when `cursor` is `None`.
    #[must_use]
    pub fn new(family: QueryFamily, login: &str, cursor: Option<&str>, page_size: u8, language_count: u8) -> Self {
        Self {
            query: family.query_text(),
            variables: Variables {
                login: login.to_string(),
                cursor: cursor.map(str::to_string),
                page_size,
                language_count,
            },
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.variables.cursor.as_deref()
    }
}
