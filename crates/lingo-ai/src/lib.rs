//! Conversation engine for lingo.
//!
//! Provides the conversation-session model, the tutor exchange that drives
//! one user-turn/assistant-turn round trip, and HTTP clients for the two
//! upstream capabilities:
//! - chat completions (OpenAI-compatible, vendor-selectable)
//! - speech-to-text (Whisper API)

pub mod provider;
pub mod session;
pub mod transcribe;
pub mod tutor;

use async_trait::async_trait;

pub use provider::{ChatClient, ChatConfig, Vendor};
pub use session::{ConversationSession, DEFAULT_HISTORY_WINDOW};
pub use transcribe::{WhisperClient, WhisperConfig};
pub use tutor::{TutorExchange, TUTOR_SYSTEM_PROMPT};

/// Upstream chat-completion capability. One call per exchange; the
/// implementation carries its own model/bounds configuration.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;
}

/// Upstream speech-to-text capability. `filename` is only used to hint the
/// audio container format.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("request timed out")]
    Timeout,
    #[error("rate limited")]
    RateLimited,
    #[error("upstream error: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("could not understand audio")]
    NoSpeech,
    #[error("transcription service error: {0}")]
    Service(String),
    #[error("{0}")]
    Other(String),
}
