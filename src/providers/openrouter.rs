//! OpenRouter balance source
//!
//! Reads total credits and total usage from OpenRouter's `/credits` endpoint.
//! Requires an API key sent as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::BalanceSource;
use crate::core::{BalanceError, BalanceSnapshot};

/// OpenRouter credits endpoint
pub const OPENROUTER_CREDITS_URL: &str = "https://openrouter.ai/api/v1/credits";

/// `data` object of the /credits response
#[derive(Debug, Default, Deserialize)]
struct CreditsData {
    total_credits: Option<f64>,
    total_usage: Option<f64>,
}

impl From<CreditsData> for BalanceSnapshot {
    fn from(data: CreditsData) -> Self {
        BalanceSnapshot::new(
            data.total_credits.unwrap_or(0.0),
            data.total_usage.unwrap_or(0.0),
        )
    }
}

/// Decode a /credits body.
///
/// The body must be a JSON object. A missing `data` counts as an empty object;
/// a `data` of any other shape, or a non-numeric field, is a failure.
fn parse_credits(body: &[u8]) -> Result<BalanceSnapshot, BalanceError> {
    let value: Value = serde_json::from_slice(body)?;

    let Value::Object(mut root) = value else {
        return Err(BalanceError::FetchFailed(
            "invalid credits response: body is not a JSON object".to_string(),
        ));
    };

    let data = match root.remove("data") {
        None => return Ok(BalanceSnapshot::default()),
        Some(data @ Value::Object(_)) => data,
        Some(other) => {
            return Err(BalanceError::FetchFailed(format!(
                "invalid credits response: `data` is not an object: {}",
                other
            )))
        }
    };

    let data: CreditsData = serde_json::from_value(data)?;
    Ok(data.into())
}

/// OpenRouter credits client
pub struct OpenRouterSource {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenRouterSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, BalanceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BalanceSource for OpenRouterSource {
    fn provider_name(&self) -> &'static str {
        "OpenRouter"
    }

    async fn fetch(&self, credential: &str) -> Result<BalanceSnapshot, BalanceError> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching OpenRouter credits");

        let resp = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("Bearer {}", credential))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(BalanceError::FetchFailed(format!(
                "OpenRouter API returned status {}",
                resp.status()
            )));
        }

        let body = resp.bytes().await?;
        parse_credits(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_KEY: &str = "test_key";

    fn source_for(server: &MockServer) -> OpenRouterSource {
        OpenRouterSource::new(
            format!("{}/api/v1/credits", server.uri()),
            Duration::from_secs(10),
        )
        .unwrap()
    }

    async fn mount_json(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/credits"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    fn assert_fetch_failed(result: Result<BalanceSnapshot, BalanceError>) {
        assert!(
            matches!(result, Err(BalanceError::FetchFailed(_))),
            "expected FetchFailed, got {:?}",
            result
        );
    }

    #[test]
    fn parse_credits_response() {
        let body = br#"{ "data": { "total_credits": 100.5, "total_usage": 25.25 } }"#;
        let snapshot = parse_credits(body).unwrap();
        assert_eq!(snapshot, BalanceSnapshot::new(100.5, 25.25));
    }

    #[test]
    fn parse_missing_fields_default_to_zero() {
        let snapshot = parse_credits(br#"{ "data": { "total_usage": 10 } }"#).unwrap();
        assert_eq!(snapshot, BalanceSnapshot::new(0.0, 10.0));

        let snapshot = parse_credits(br#"{ "data": { "total_credits": 5 } }"#).unwrap();
        assert_eq!(snapshot, BalanceSnapshot::new(5.0, 0.0));
    }

    #[test]
    fn parse_missing_data_object() {
        assert_eq!(parse_credits(b"{}").unwrap(), BalanceSnapshot::default());
    }

    #[test]
    fn parse_null_fields_default_to_zero() {
        let body = br#"{ "data": { "total_credits": null, "total_usage": 3.5 } }"#;
        assert_eq!(parse_credits(body).unwrap(), BalanceSnapshot::new(0.0, 3.5));
    }

    #[test]
    fn parse_rejects_non_numeric_fields() {
        assert_fetch_failed(parse_credits(br#"{ "data": { "total_credits": "lots" } }"#));
    }

    #[test]
    fn parse_rejects_non_object_bodies() {
        assert_fetch_failed(parse_credits(b"[]"));
        assert_fetch_failed(parse_credits(b"null"));
        assert_fetch_failed(parse_credits(b"42"));
        assert_fetch_failed(parse_credits(br#"[{ "total_credits": 7, "total_usage": 2 }]"#));
    }

    #[test]
    fn parse_rejects_non_object_data() {
        assert_fetch_failed(parse_credits(br#"{ "data": [5, 1] }"#));
        assert_fetch_failed(parse_credits(br#"{ "data": null }"#));
        assert_fetch_failed(parse_credits(br#"{ "data": "x" }"#));
    }

    #[tokio::test]
    async fn fetch_sends_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/credits"))
            .and(header("Authorization", "Bearer test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "total_credits": 100.50, "total_usage": 25.25 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server);
        let snapshot = source.fetch(TEST_KEY).await.unwrap();

        assert_eq!(snapshot.total_credits, 100.50);
        assert_eq!(snapshot.total_usage, 25.25);
    }

    #[tokio::test]
    async fn fetch_fails_on_unauthorized() {
        let server = MockServer::start().await;
        let body = json!({ "error": { "message": "No auth credentials found" } });
        mount_json(&server, 401, body).await;

        let source = source_for(&server);
        let err = source.fetch(TEST_KEY).await.unwrap_err();

        assert!(matches!(err, BalanceError::FetchFailed(_)));
    }

    #[tokio::test]
    async fn fetch_fails_on_server_error() {
        let server = MockServer::start().await;
        mount_json(&server, 503, json!({})).await;

        let source = source_for(&server);
        assert!(matches!(
            source.fetch(TEST_KEY).await,
            Err(BalanceError::FetchFailed(_))
        ));
    }

    #[tokio::test]
    async fn fetch_fails_on_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/credits"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let source = source_for(&server);
        let err = source.fetch(TEST_KEY).await.unwrap_err();

        assert!(err.to_string().contains("invalid credits response"));
    }

    #[tokio::test]
    async fn fetch_fails_on_array_bodies() {
        for body in [
            json!([]),
            json!({ "data": [5, 1] }),
            json!([{ "total_credits": 7, "total_usage": 2 }]),
            json!({ "data": null }),
            json!(null),
        ] {
            let server = MockServer::start().await;
            mount_json(&server, 200, body).await;

            let source = source_for(&server);
            assert_fetch_failed(source.fetch(TEST_KEY).await);
        }
    }

    #[tokio::test]
    async fn fetch_fails_on_unfollowed_redirect() {
        let server = MockServer::start().await;
        mount_json(&server, 302, json!({ "data": { "total_credits": 5 } })).await;

        let source = source_for(&server);
        let err = source.fetch(TEST_KEY).await.unwrap_err();

        assert!(err.to_string().contains("status 302"));
    }

    #[tokio::test]
    async fn fetch_fails_on_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/credits"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": {} }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let source = OpenRouterSource::new(
            format!("{}/api/v1/credits", server.uri()),
            Duration::from_millis(50),
        )
        .unwrap();

        assert!(matches!(
            source.fetch(TEST_KEY).await,
            Err(BalanceError::FetchFailed(_))
        ));
    }

    #[tokio::test]
    async fn fetch_fails_when_unreachable() {
        let source = OpenRouterSource::new(
            "http://127.0.0.1:9/api/v1/credits",
            Duration::from_secs(2),
        )
        .unwrap();

        assert!(matches!(
            source.fetch(TEST_KEY).await,
            Err(BalanceError::FetchFailed(_))
        ));
    }

    #[test]
    fn default_endpoint_is_openrouter_credits() {
        let source =
            OpenRouterSource::new(OPENROUTER_CREDITS_URL, Duration::from_secs(10)).unwrap();
        assert_eq!(source.endpoint(), "https://openrouter.ai/api/v1/credits");
        assert_eq!(source.provider_name(), "OpenRouter");
    }
}
