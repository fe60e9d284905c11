use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::CatalogError;

/// Query pairs in the order they are sent; keys may repeat (`includes[]`).
pub type Query = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body, or `Http { status }` when the upstream did not succeed.
    pub fn into_success(self) -> Result<Value, CatalogError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(CatalogError::Http { status: self.status })
        }
    }
}

/// How the catalog client reaches the API. One call per request; no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<UpstreamResponse, CatalogError>;
}

/// Plain HTTP against the proxy mount (or the upstream directly).
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, CatalogError> {
        let base = Url::parse(&config.base_url)
            .map_err(|_| CatalogError::InvalidUrl(config.base_url.clone()))?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<UpstreamResponse, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else if status.is_success() {
            serde_json::from_str(&text)?
        } else {
            // gateway error pages are often HTML
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };
        let status = status.as_u16();
        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_success_becomes_http_error() {
        let resp = UpstreamResponse { status: 404, body: json!({"error": "MangaDex API error: 404"}) };
        match resp.into_success() {
            Err(CatalogError::Http { status }) => assert_eq!(status, 404),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn success_returns_body() {
        let resp = UpstreamResponse { status: 200, body: json!({"data": []}) };
        assert_eq!(resp.into_success().unwrap(), json!({"data": []}));
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let cfg = ClientConfig { base_url: "http://localhost:8081/api/".to_string(), ..ClientConfig::default() };
        let transport = HttpTransport::new(&cfg).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8081/api");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let cfg = ClientConfig { base_url: "::nope".to_string(), ..ClientConfig::default() };
        assert!(matches!(HttpTransport::new(&cfg), Err(CatalogError::InvalidUrl(_))));
    }
}
