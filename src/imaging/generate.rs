use crate::config::Config;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    #[error("image generation failed with status {0}")]
    Status(StatusCode),
    #[error("image generation request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Client for a hosted text-to-image inference endpoint.
pub struct ImageGenClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl ImageGenClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.image_timeout_secs))
            .build()?;
        Ok(Self::with_http_client(
            http,
            &config.image_api_url,
            config.image_api_key.as_deref(),
        ))
    }

    pub fn with_http_client(http: reqwest::Client, url: &str, api_key: Option<&str>) -> Self {
        Self {
            http,
            url: url.to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    /// Generate an image for `prompt`, returning the raw response body.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageGenError> {
        info!("Requesting image for prompt: {}", prompt);

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.api_key.as_deref().unwrap_or_default())
            .json(&json!({
                "inputs": prompt,
                "options": { "wait_for_model": true }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageGenError::Status(status));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;

    #[tokio::test]
    async fn test_generate_returns_body_bytes() {
        let server = MockServer::start_async().await;
        let image_bytes = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/sd")
                    .header("authorization", "Bearer hf-key")
                    .json_body(json!({
                        "inputs": "a dragon",
                        "options": { "wait_for_model": true }
                    }));
                then.status(200)
                    .header("content-type", "image/png")
                    .body(image_bytes.clone());
            })
            .await;

        let client = ImageGenClient::with_http_client(
            reqwest::Client::new(),
            &server.url("/models/sd"),
            Some("hf-key"),
        );

        let bytes = client.generate("a dragon").await.unwrap();
        assert_eq!(bytes, image_bytes);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_surfaces_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/sd");
                then.status(503).body("model loading");
            })
            .await;

        let client =
            ImageGenClient::with_http_client(reqwest::Client::new(), &server.url("/models/sd"), None);

        match client.generate("a cat").await {
            Err(ImageGenError::Status(status)) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("expected status error, got {:?}", other.map(|b| b.len())),
        }
    }
}
