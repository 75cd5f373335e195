//! CompletionProvider trait implementation for ChatClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{CompletionError, CompletionProvider, Message};

use super::client::ChatClient;

#[async_trait]
impl CompletionProvider for ChatClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let body = self.build_request_body(messages);

        debug!(
            vendor = ?self.config.vendor,
            model = %self.config.model,
            "chat completions request"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = text.chars().take(200).collect::<String>();
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        self.parse_response(json)
    }
}
