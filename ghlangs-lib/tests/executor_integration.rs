//! Integration tests for the retrying GraphQL executor against a wiremock server.

use core::time::Duration;
use ghlangs_lib::collect::{Client, Executor, Response, RetryPolicy, Sleeper, UserData};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sleeper that records every requested wait and returns immediately.
#[derive(Debug, Clone, Default)]
struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.slept.lock().unwrap().push(duration);
        core::future::ready(())
    }
}

const DELAY: Duration = Duration::from_millis(100);
const COOLDOWN: Duration = Duration::from_secs(60);

fn executor(server: &MockServer, sleeper: RecordingSleeper) -> Executor<RecordingSleeper> {
    let client = Client::new("test-token", format!("{}/graphql", server.uri()), Duration::from_secs(5)).unwrap();
    Executor::with_sleeper(client, RetryPolicy::default(), 3, sleeper)
}

fn body() -> serde_json::Value {
    json!({ "query": "query { viewer { login } }", "variables": {} })
}

fn user_payload() -> serde_json::Value {
    json!({
        "data": {
            "user": {
                "repos": {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "nodes": []
                }
            }
        }
    })
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_success_on_first_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let response: Response<UserData> = executor(&server, sleeper.clone()).execute(&body()).await;

    assert!(response.data.unwrap().user.is_some());
    assert_eq!(sleeper.slept(), vec![DELAY]);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_server_errors_give_up_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let response: Response<UserData> = executor(&server, sleeper.clone()).execute(&body()).await;

    assert!(response.is_empty());
    // Only the smoothing delay before each attempt; bad statuses retry immediately.
    assert_eq!(sleeper.slept(), vec![DELAY, DELAY, DELAY]);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_rate_limit_cools_down_between_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(403))
        .expect(3)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let response: Response<UserData> = executor(&server, sleeper.clone()).execute(&body()).await;

    assert!(response.is_empty());
    assert_eq!(sleeper.slept(), vec![DELAY, COOLDOWN, DELAY, COOLDOWN, DELAY]);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_rate_limit_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_payload()))
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let response: Response<UserData> = executor(&server, sleeper.clone()).execute(&body()).await;

    assert!(response.data.is_some());
    assert_eq!(sleeper.slept(), vec![DELAY, COOLDOWN, DELAY]);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_payload_errors_are_retried_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [ { "type": "NOT_FOUND", "message": "Could not resolve to a User" } ]
        })))
        .expect(3)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let response: Response<UserData> = executor(&server, sleeper.clone()).execute(&body()).await;

    assert!(response.is_empty());
    assert_eq!(sleeper.slept(), vec![DELAY, DELAY, DELAY]);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_undecodable_body_backs_off_exponentially() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>bad gateway</html>"))
        .expect(3)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let response: Response<UserData> = executor(&server, sleeper.clone()).execute(&body()).await;

    assert!(response.is_empty());
    assert_eq!(
        sleeper.slept(),
        vec![DELAY, Duration::from_secs(1), DELAY, Duration::from_secs(2), DELAY]
    );
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_connection_refused_gives_up() {
    let sleeper = RecordingSleeper::default();
    let policy = RetryPolicy {
        max_attempts: 2,
        ..RetryPolicy::default()
    };
    let client = Client::new("test-token", "http://127.0.0.1:1/graphql", Duration::from_secs(2)).unwrap();
    let executor = Executor::with_sleeper(client, policy, 1, sleeper.clone());

    let response: Response<UserData> = executor.execute(&body()).await;

    assert!(response.is_empty());
    assert_eq!(sleeper.slept(), vec![DELAY, Duration::from_secs(1), DELAY]);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_concurrent_queries_share_the_executor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_payload()).set_delay(Duration::from_millis(20)))
        .expect(6)
        .mount(&server)
        .await;

    let executor = executor(&server, RecordingSleeper::default());
    let request = body();
    let results: Vec<Response<UserData>> =
        futures_util::future::join_all((0..6).map(|_| executor.execute(&request))).await;

    assert!(results.iter().all(|r| r.data.is_some()));
}
