//! GitHub GraphQL client
//!
//! Minimal client that posts one query and classifies the outcome for the retry policy.

use super::model::Response;
use super::retry::Failure;
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "    client";

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!("ghlangs/", env!("CARGO_PKG_VERSION"));

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Result of a single GraphQL call
#[derive(Debug)]
pub enum ApiResult<T> {
    /// HTTP 200 with a decoded payload that carries no `errors` field.
    Success(Response<T>),

    /// The attempt failed; the string describes why, for logging.
    Failed(Failure, String),
}

/// GraphQL API client authenticated with a bearer token.
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    api_url: String,
}

impl Client {
    /// Create a new client for `api_url`, sending `token` as a bearer credential.
    pub fn new(token: &str, api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        use reqwest::header::{AUTHORIZATION, HeaderValue};

        let mut auth_val = HeaderValue::from_str(&format!("Bearer {token}"))?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Get the endpoint this client posts to
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Post one GraphQL request and classify the result
    pub async fn post<B, T>(&self, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = match self.client.post(&self.api_url).json(body).send().await {
            Ok(r) => r,
            Err(e) => return ApiResult::Failed(Failure::Transport, format!("{e:#}")),
        };

        let status = resp.status();
        if let Some(rl) = extract_rate_limit_from_headers(resp.headers()) {
            log::debug!(
                target: LOG_TARGET,
                "GraphQL rate limit: {} remaining, resets at {}",
                rl.remaining,
                rl.reset_at.with_timezone(&chrono::Local).format("%T")
            );
        }

        if status == StatusCode::FORBIDDEN {
            return ApiResult::Failed(Failure::RateLimited, format!("HTTP {status}"));
        }

        if status != StatusCode::OK {
            return ApiResult::Failed(Failure::BadStatus(status.as_u16()), format!("HTTP {status}"));
        }

        let bytes = match resp.bytes().await {
            Ok(b) => b,
            Err(e) => return ApiResult::Failed(Failure::Transport, format!("reading response body: {e:#}")),
        };

        classify_payload(&bytes)
    }
}

/// Decode a 200 response body, treating an `errors` field as a failed attempt.
fn classify_payload<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    let response: Response<T> = match serde_json::from_slice(bytes) {
        Ok(r) => r,
        Err(e) => return ApiResult::Failed(Failure::Transport, format!("decoding response: {e}")),
    };

    if let Some(errors) = &response.errors {
        let messages = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        return ApiResult::Failed(Failure::PayloadErrors, messages);
    }

    ApiResult::Success(response)
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::model::UserData;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_classify_success() {
        let body = br#"{ "data": { "user": null } }"#;
        match classify_payload::<UserData>(body) {
            ApiResult::Success(response) => assert!(response.data.unwrap().user.is_none()),
            ApiResult::Failed(f, detail) => panic!("unexpected failure {f}: {detail}"),
        }
    }

    #[test]
    fn test_classify_payload_errors() {
        let body = br#"{ "data": null, "errors": [ { "message": "first" }, { "message": "second" } ] }"#;
        match classify_payload::<UserData>(body) {
            ApiResult::Failed(Failure::PayloadErrors, detail) => assert_eq!(detail, "first; second"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_classify_payload_errors_include_type() {
        let body = br#"{ "data": null, "errors": [ { "type": "NOT_FOUND", "message": "Could not resolve to a User" } ] }"#;
        match classify_payload::<UserData>(body) {
            ApiResult::Failed(Failure::PayloadErrors, detail) => assert_eq!(detail, "NOT_FOUND: Could not resolve to a User"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_classify_undecodable_body_is_transport_failure() {
        match classify_payload::<UserData>(b"<html>oops</html>") {
            ApiResult::Failed(Failure::Transport, detail) => assert!(detail.starts_with("decoding response")),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_extract_rate_limit_from_headers() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert("x-ratelimit-remaining", HeaderValue::from_static("4999"));
        let _ = headers.insert("x-ratelimit-reset", HeaderValue::from_static("1704067200"));

        let rate_limit = extract_rate_limit_from_headers(&headers).unwrap();

        assert_eq!(rate_limit.remaining, 4999);
        assert_eq!(rate_limit.reset_at.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_extract_rate_limit_missing_headers() {
        let headers = HeaderMap::new();
        assert!(extract_rate_limit_from_headers(&headers).is_none());
    }

    #[test]
    fn test_extract_rate_limit_invalid_remaining() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert("x-ratelimit-remaining", HeaderValue::from_static("invalid"));
        let _ = headers.insert("x-ratelimit-reset", HeaderValue::from_static("1704067200"));

        assert!(extract_rate_limit_from_headers(&headers).is_none());
    }

    #[test]
    fn test_client_new() {
        let client = Client::new("test_token", DEFAULT_API_URL, Duration::from_secs(5)).unwrap();
        assert_eq!(client.api_url(), "https://api.github.com/graphql");
    }

    #[test]
    fn test_client_rejects_token_with_newline() {
        assert!(Client::new("bad\ntoken", DEFAULT_API_URL, Duration::from_secs(5)).is_err());
    }
}
