//! Whisper API client for speech-to-text.
//!
//! Uploaded audio goes straight to the transcription endpoint as a multipart
//! form; the filename only hints the container format. Implements the
//! `TranscriptionProvider` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::{ConfigError, TranscriptionError, TranscriptionProvider};

const WHISPER_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Whisper API client configuration.
#[derive(Clone)]
pub struct WhisperConfig {
    pub api_key: String,
    pub model: String,
    pub language: Option<String>,
}

impl std::fmt::Debug for WhisperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}

impl WhisperConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "whisper-1".to_string(),
            language: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingCredential("OPENAI_API_KEY"))?;
        Ok(Self::new(api_key))
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }
}

/// Whisper speech-to-text client.
pub struct WhisperClient {
    config: WhisperConfig,
    http: reqwest::Client,
}

impl WhisperClient {
    pub fn new(config: WhisperConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(300))
                .build()
                .expect("failed to build HTTP client"),
        }
    }
}

/// Map a filename extension to the upload mime type.
fn mime_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("webm") => "audio/webm",
        Some("ogg") => "audio/ogg",
        _ => "audio/wav",
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperClient {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
    ) -> Result<String, TranscriptionError> {
        debug!(
            model = %self.config.model,
            size = audio.len(),
            "transcription request"
        );

        let file_part = reqwest::multipart::Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(mime_for(filename))
            .map_err(|e| TranscriptionError::Other(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone());

        if let Some(ref lang) = self.config.language {
            form = form.text("language", lang.clone());
        }

        let response = self
            .http
            .post(WHISPER_API_URL)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Service(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Other(e.to_string()))?;

        text_from_response(json)
    }
}

/// Extract the transcript. Whisper answers silent or unintelligible clips
/// with an empty transcript; surface that as the no-speech case.
fn text_from_response(json: serde_json::Value) -> Result<String, TranscriptionError> {
    let text = json["text"]
        .as_str()
        .ok_or_else(|| TranscriptionError::Other("no 'text' field in response".into()))?;

    if text.trim().is_empty() {
        return Err(TranscriptionError::NoSpeech);
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_the_extension() {
        assert_eq!(mime_for("clip.mp3"), "audio/mpeg");
        assert_eq!(mime_for("clip.m4a"), "audio/mp4");
        assert_eq!(mime_for("clip.webm"), "audio/webm");
        assert_eq!(mime_for("clip.ogg"), "audio/ogg");
        assert_eq!(mime_for("clip.wav"), "audio/wav");
        assert_eq!(mime_for("noext"), "audio/wav");
    }

    #[test]
    fn debug_redacts_the_credential() {
        let config = WhisperConfig::new("sk-very-secret").with_language("en");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn empty_transcript_is_no_speech() {
        let err = text_from_response(serde_json::json!({"text": "   "})).unwrap_err();
        assert!(matches!(err, TranscriptionError::NoSpeech));

        let err = text_from_response(serde_json::json!({})).unwrap_err();
        assert!(matches!(err, TranscriptionError::Other(_)));

        let text = text_from_response(serde_json::json!({"text": "hello there"})).unwrap();
        assert_eq!(text, "hello there");
    }
}
