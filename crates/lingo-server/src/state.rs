//! Shared application state: the explicitly constructed tutor service,
//! injected into every handler instead of living at module scope.

use std::sync::Arc;

use lingo_ai::{
    ChatClient, ChatConfig, TranscriptionProvider, TutorExchange, WhisperClient, WhisperConfig,
};

/// The constructed service: a tutor exchange plus (optionally) a
/// transcriber for the audio surface.
pub struct TutorService {
    pub exchange: TutorExchange,
    pub transcriber: Option<Arc<dyn TranscriptionProvider>>,
}

/// Handler state. `tutor` is `None` when the chat credential was absent at
/// startup — the server still runs, but every chat surface reports
/// unavailable.
#[derive(Clone)]
pub struct AppState {
    pub tutor: Option<Arc<TutorService>>,
}

impl AppState {
    /// Resolve provider configuration from the environment. A missing chat
    /// credential yields an unconfigured state; a missing transcription
    /// credential only disables the audio surface.
    pub fn from_env() -> Self {
        let tutor = match ChatConfig::from_env() {
            Ok(config) => {
                tracing::info!(
                    vendor = ?config.vendor,
                    model = %config.model,
                    "chat provider configured"
                );
                let exchange = TutorExchange::new(Arc::new(ChatClient::new(config)));

                let transcriber: Option<Arc<dyn TranscriptionProvider>> =
                    match WhisperConfig::from_env() {
                        Ok(config) => Some(Arc::new(WhisperClient::new(
                            config.with_language("en"),
                        ))),
                        Err(e) => {
                            tracing::warn!(error = %e, "audio chat disabled");
                            None
                        }
                    };

                Some(Arc::new(TutorService {
                    exchange,
                    transcriber,
                }))
            }
            Err(e) => {
                tracing::warn!(error = %e, "starting without a chat provider");
                None
            }
        };

        Self { tutor }
    }

    pub fn configured(&self) -> bool {
        self.tutor.is_some()
    }
}
