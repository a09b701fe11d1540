//! Mixpanel data export API client

use super::types::{EngageResponse, SegmentationResponse};
use super::{AnalyticsClient, EventPropertiesQuery, EventsQuery};
use crate::config::MixpanelConfig;
use crate::error::{MixpanelError, Result};
use async_trait::async_trait;
use md5::{Digest, Md5};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Series type requested from the segmentation endpoints
const SERIES_TYPE: &str = "general";

/// Payloads that can carry an API-level error
pub trait ApiPayload: DeserializeOwned {
    fn error_message(&self) -> Option<String>;
}

impl ApiPayload for EngageResponse {
    fn error_message(&self) -> Option<String> {
        EngageResponse::error_message(self)
    }
}

impl ApiPayload for SegmentationResponse {
    fn error_message(&self) -> Option<String> {
        SegmentationResponse::error_message(self)
    }
}

/// Mixpanel API client
#[derive(Debug, Clone)]
pub struct MixpanelClient {
    client: Client,
    api_key: String,
    api_secret: String,
    api_base: String,
    signature_ttl: Duration,
}

impl MixpanelClient {
    /// Create a client from a validated configuration
    pub fn new(config: &MixpanelConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("nestor-mixpanel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            api_base: config.api_base.clone(),
            signature_ttl: config.signature_ttl,
        })
    }

    /// Create from `NESTOR_MIXPANEL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(&MixpanelConfig::from_env()?)
    }

    /// Full URL of an endpoint such as `engage/`
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.api_base, endpoint))?)
    }

    /// Add `api_key`, `expire` and `sig` to the query parameters
    ///
    /// `now` is the current unix time in seconds.
    pub fn signed_params(&self, mut params: Vec<(String, String)>, now: i64) -> Vec<(String, String)> {
        let ttl = i64::try_from(self.signature_ttl.as_secs()).unwrap_or(i64::MAX);
        params.push(("api_key".to_string(), self.api_key.clone()));
        params.push(("expire".to_string(), now.saturating_add(ttl).to_string()));

        let sig = sign(&params, &self.api_secret);
        params.push(("sig".to_string(), sig));
        params
    }

    async fn get<T: ApiPayload>(&self, endpoint: &str, params: Vec<(String, String)>) -> Result<T> {
        let url = self.endpoint_url(endpoint)?;
        let params = self.signed_params(params, chrono::Utc::now().timestamp());

        debug!(endpoint, "Requesting Mixpanel data");
        let response = self.client.get(url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let payload = decode_payload::<T>(status, body)?;
        if let Some(error) = payload.error_message() {
            warn!(endpoint, status = status.as_u16(), %error, "Mixpanel returned an error payload");
        }
        Ok(payload)
    }
}

/// Classify a response body
///
/// Error payloads come back as `Ok` whatever the status so they can be shown
/// to the user. Any other non-success response is an `HttpError`; a success
/// body that does not parse is a `JsonError`.
pub fn decode_payload<T: ApiPayload>(status: StatusCode, body: String) -> Result<T> {
    match serde_json::from_str::<T>(&body) {
        Ok(payload) if status.is_success() || payload.error_message().is_some() => Ok(payload),
        Ok(_) => Err(MixpanelError::HttpError {
            status: status.as_u16(),
            body,
        }),
        Err(_) if !status.is_success() => Err(MixpanelError::HttpError {
            status: status.as_u16(),
            body,
        }),
        Err(err) => Err(err.into()),
    }
}

/// Request signature: md5 of the sorted `key=value` pairs followed by the secret
pub fn sign(params: &[(String, String)], secret: &str) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .filter(|(key, _)| key != "sig")
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    pairs.sort();

    let mut hasher = Md5::new();
    hasher.update(pairs.concat().as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn segmentation_params(
    period: &crate::time_period::TimePeriod,
    extra: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut params = extra;
    params.push(("type".to_string(), SERIES_TYPE.to_string()));
    params.push(("unit".to_string(), period.unit.as_str().to_string()));
    params.push(("interval".to_string(), period.interval_param()));
    params
}

#[async_trait]
impl AnalyticsClient for MixpanelClient {
    async fn engage(&self) -> Result<EngageResponse> {
        self.get("engage/", Vec::new()).await
    }

    async fn events(&self, query: EventsQuery) -> Result<SegmentationResponse> {
        let event = serde_json::to_string(&[&query.event])?;
        let params = segmentation_params(&query.period, vec![("event".to_string(), event)]);
        self.get("events/", params).await
    }

    async fn event_properties(&self, query: EventPropertiesQuery) -> Result<SegmentationResponse> {
        let params = segmentation_params(
            &query.period,
            vec![
                ("event".to_string(), query.event),
                ("name".to_string(), query.property),
            ],
        );
        self.get("events/properties/", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_period::TimePeriod;

    fn client() -> MixpanelClient {
        let config = MixpanelConfig::builder()
            .api_key("test_key")
            .api_secret("test_secret")
            .build()
            .unwrap();
        MixpanelClient::new(&config).unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.api_key, "test_key");
        assert_eq!(
            client.endpoint_url("engage/").unwrap().as_str(),
            "https://mixpanel.com/api/2.0/engage/"
        );
    }

    #[test]
    fn test_signature_ignores_parameter_order() {
        let a = pairs(&[("unit", "day"), ("interval", "2"), ("type", "general")]);
        let b = pairs(&[("type", "general"), ("unit", "day"), ("interval", "2")]);
        assert_eq!(sign(&a, "secret"), sign(&b, "secret"));
        assert_ne!(sign(&a, "secret"), sign(&a, "other"));
    }

    #[test]
    fn test_signature_matches_md5_of_sorted_pairs() {
        let params = pairs(&[("b", "2"), ("a", "1")]);
        let expected = hex::encode(Md5::digest(b"a=1b=2secret"));
        assert_eq!(sign(&params, "secret"), expected);
    }

    #[test]
    fn test_signed_params() {
        let client = client();
        let params = client.signed_params(pairs(&[("unit", "day")]), 1_000);

        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("api_key").as_deref(), Some("test_key"));
        assert_eq!(get("expire").as_deref(), Some("1600"));

        let unsigned: Vec<_> = params.iter().filter(|(k, _)| k != "sig").cloned().collect();
        assert_eq!(get("sig"), Some(sign(&unsigned, "test_secret")));
    }

    #[test]
    fn test_segmentation_params() {
        let params = segmentation_params(&TimePeriod::parse("3 weeks"), Vec::new());
        assert!(params.contains(&("type".to_string(), "general".to_string())));
        assert!(params.contains(&("unit".to_string(), "week".to_string())));
        assert!(params.contains(&("interval".to_string(), "3".to_string())));
    }

    #[test]
    fn test_decode_error_payload_with_failure_status() {
        let body = r#"{"error": "Invalid API key", "request": "/api/2.0/engage/"}"#;
        let payload: EngageResponse =
            decode_payload(StatusCode::BAD_REQUEST, body.to_string()).unwrap();
        assert_eq!(payload.error_message().as_deref(), Some("Invalid API key"));
    }

    #[test]
    fn test_decode_success() {
        let body = r#"{"data": {"series": [], "values": {}}}"#;
        let payload: SegmentationResponse = decode_payload(StatusCode::OK, body.to_string()).unwrap();
        assert_eq!(payload.error_message(), None);
    }

    #[test]
    fn test_decode_failure_status_without_error_payload() {
        let result: Result<EngageResponse> =
            decode_payload(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>".to_string());
        match result {
            Err(MixpanelError::HttpError { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.contains("Bad Gateway"));
            }
            other => panic!("Expected HttpError, got {other:?}"),
        }

        let result: Result<EngageResponse> =
            decode_payload(StatusCode::SERVICE_UNAVAILABLE, r#"{"results": []}"#.to_string());
        assert!(matches!(
            result,
            Err(MixpanelError::HttpError { status: 503, .. })
        ));
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let result: Result<SegmentationResponse> =
            decode_payload(StatusCode::OK, "not json".to_string());
        assert!(matches!(result, Err(MixpanelError::JsonError(_))));
    }

    #[tokio::test]
    #[ignore] // Requires API credentials and network access
    async fn test_engage_live() {
        let client = MixpanelClient::from_env().unwrap();
        let response = client.engage().await;
        assert!(response.is_ok());
    }
}
