//! Caller-facing wire types: WebSocket frames and HTTP payloads.

use lingo_ai::Message;
use serde::{Deserialize, Serialize};

/// Frames a WebSocket client sends.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "text_message")]
    TextMessage { content: String },

    #[serde(rename = "clear_history")]
    ClearHistory,
}

/// Frames the server sends back over a WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "chat_response")]
    ChatResponse {
        user_message: String,
        ai_response: String,
        conversation_history: Vec<Message>,
    },

    #[serde(rename = "history_cleared")]
    HistoryCleared { message: String },

    #[serde(rename = "error")]
    Error { message: String },
}

/// Response body for the stateless audio exchange.
#[derive(Debug, Serialize)]
pub struct AudioChatResponse {
    pub transcription: String,
    pub response: String,
    pub conversation_history: Vec<Message>,
    pub error: Option<String>,
}

/// Response body for the health route.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_frames_parse_by_type_tag() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "text_message", "content": "hello"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::TextMessage { content } if content == "hello"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type": "clear_history"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::ClearHistory));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "unknown"}"#).is_err());
    }

    #[test]
    fn server_frames_carry_their_type_tag() {
        let json = serde_json::to_value(ServerMessage::ChatResponse {
            user_message: "hi".into(),
            ai_response: "✅ Looks good!".into(),
            conversation_history: vec![Message::user("hi")],
        })
        .unwrap();
        assert_eq!(json["type"], "chat_response");
        assert_eq!(json["conversation_history"][0]["role"], "user");

        let json = serde_json::to_value(ServerMessage::HistoryCleared {
            message: "History cleared".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "history_cleared");

        let json = serde_json::to_value(ServerMessage::Error {
            message: "nope".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "error");
    }
}
