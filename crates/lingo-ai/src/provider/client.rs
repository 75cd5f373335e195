//! Chat client struct, request building, and response parsing.

use crate::{CompletionError, Message, Role};

use super::config::ChatConfig;

/// Chat-completions API client.
pub struct ChatClient {
    pub(crate) config: ChatConfig,
    pub(crate) http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    /// Build the JSON request body. The system prompt rides in-line as the
    /// first message, as the chat-completions format expects.
    pub(crate) fn build_request_body(&self, messages: &[Message]) -> serde_json::Value {
        let msgs: Vec<_> = messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                serde_json::json!({
                    "role": role,
                    "content": msg.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "messages": msgs,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }

    /// Extract the reply text from a chat-completions response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<String, CompletionError> {
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                CompletionError::Malformed("no choices[0].message.content in response".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Vendor;

    fn client() -> ChatClient {
        ChatClient::new(ChatConfig::new(Vendor::Mistral, "sk-test"))
    }

    #[test]
    fn request_body_carries_model_and_bounds() {
        let body = client().build_request_body(&[Message::user("hi")]);

        assert_eq!(body["model"], "mistral-small");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 500);
    }

    #[test]
    fn request_body_preserves_message_order_and_roles() {
        let messages = [
            Message::system("persona"),
            Message::user("He go school yesterday."),
            Message::assistant("✅ Corrected Sentence: ..."),
            Message::user("thanks"),
        ];
        let body = client().build_request_body(&messages);

        let msgs = body["messages"].as_array().unwrap();
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[1]["role"], "user");
        assert_eq!(msgs[1]["content"], "He go school yesterday.");
        assert_eq!(msgs[2]["role"], "assistant");
        assert_eq!(msgs[3]["content"], "thanks");
    }

    #[test]
    fn parse_response_extracts_reply_text() {
        let json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "✅ Looks good!"}}]
        });
        assert_eq!(client().parse_response(json).unwrap(), "✅ Looks good!");
    }

    #[test]
    fn parse_response_rejects_missing_content() {
        let json = serde_json::json!({"choices": []});
        let err = client().parse_response(json).unwrap_err();
        assert!(matches!(err, CompletionError::Malformed(_)));
    }
}
