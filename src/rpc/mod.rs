use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    content: String,
}

/// Client for the external document generator. The merged plan document
/// goes out as JSON; the rendered result comes back opaque.
#[derive(Debug, Clone)]
pub struct RendererClient {
    client: reqwest::Client,
    base_url: String,
}

impl RendererClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build renderer client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Sends a merged document for rendering and returns the result.
    pub async fn generate(&self, document: &str) -> Result<String> {
        let url = format!("{}/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest { content: document })
            .send()
            .await
            .map_err(|e| Error::Renderer(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Renderer(format!(
                "renderer returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Renderer(format!("invalid renderer response: {e}")))?;

        Ok(body.content)
    }
}
