#[cfg(feature = "http_client")]
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

#[cfg(feature = "http_client")]
use crate::http::HttpClient;
use crate::FormkitError;

/// Where remote-backed selects get their records from: a GET on `url`
/// returning a JSON array.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<Value>, FormkitError>;
}

/// Interprets a response body as the array of option records.
pub fn parse_records(body: &[u8]) -> Result<Vec<Value>, FormkitError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(records) => Ok(records),
        other => Err(FormkitError::String(format!(
            "Expected a JSON array of options, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(feature = "http_client")]
#[derive(Clone, Default)]
pub struct HttpRecordSource {
    client: HttpClient,
}

#[cfg(feature = "http_client")]
impl HttpRecordSource {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http_client")]
#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self, url: &str) -> Result<Vec<Value>, FormkitError> {
        let headers = HashMap::from([(
            "Accept".to_string(),
            "application/json".to_string(),
        )]);
        let response = self.client.get(url, Some(&headers)).await?;
        log::debug!("GET {} returned {}", url, response.status_code());
        match response.body() {
            Some(body) => parse_records(body),
            None => Err(FormkitError::String(format!(
                "Empty response from {}",
                url
            ))),
        }
    }
}

/// Source that never delivers, for running without network access.
#[derive(Debug, Clone, Default)]
pub struct OfflineSource;

#[async_trait]
impl RecordSource for OfflineSource {
    async fn fetch(&self, url: &str) -> Result<Vec<Value>, FormkitError> {
        Err(FormkitError::String(format!("Offline, not fetching {}", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let records = parse_records(br#"[{"a": 1}, "b"]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(parse_records(br#"{"a": 1}"#).is_err());
        assert!(parse_records(b"not json").is_err());
    }

    #[tokio::test]
    async fn test_offline_source_fails() {
        let result = OfflineSource.fetch("https://example.com").await;
        assert!(result.is_err());
    }
}
