//! HTTP surface: health, the stateless audio exchange, and the WebSocket
//! upgrade.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use lingo_ai::{ConversationSession, Message};

use crate::connection;
use crate::error::ApiError;
use crate::protocol::{AudioChatResponse, HealthResponse};
use crate::state::AppState;

// Browser recordings of a single utterance stay well under this.
const AUDIO_UPLOAD_LIMIT_BYTES: usize = 25 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route(
            "/chat/audio",
            post(chat_audio).layer(DefaultBodyLimit::max(AUDIO_UPLOAD_LIMIT_BYTES)),
        )
        .route("/ws/chat", get(ws_chat))
        .layer(cors)
        .with_state(state)
}

/// GET / — reports whether the chat provider is configured.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.configured() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ready",
                version: env!("CARGO_PKG_VERSION"),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "not_configured",
                version: env!("CARGO_PKG_VERSION"),
            }),
        )
    }
}

/// GET /ws/chat — upgrade to the persistent chat surface.
async fn ws_chat(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| connection::handle_socket(socket, state))
}

/// POST /chat/audio — one stateless exchange: multipart audio plus the
/// caller's prior history; returns transcription, reply, and updated history.
async fn chat_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AudioChatResponse>, ApiError> {
    let service = state.tutor.ok_or(ApiError::NotConfigured)?;

    let mut audio: Option<(Vec<u8>, String)> = None;
    let mut history_json: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let filename = field.file_name().unwrap_or("audio.wav").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                audio = Some((bytes.to_vec(), filename));
            }
            "conversation_history" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                history_json = Some(text);
            }
            _ => {}
        }
    }

    let (audio_bytes, filename) =
        audio.ok_or_else(|| ApiError::BadRequest("missing 'audio' part".into()))?;
    let history = parse_history(history_json.as_deref().unwrap_or("[]"))?;

    let Some(transcriber) = service.transcriber.as_ref() else {
        return Ok(Json(transcription_failure(
            history,
            "transcription service not configured",
        )));
    };

    let utterance = match transcriber.transcribe(audio_bytes, &filename).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "transcription failed");
            return Ok(Json(transcription_failure(history, &e.to_string())));
        }
    };

    let mut session = ConversationSession::from_history(history);
    let reply = service.exchange.respond(&mut session, &utterance).await;

    Ok(Json(AudioChatResponse {
        transcription: utterance,
        response: reply,
        conversation_history: session.messages().to_vec(),
        error: None,
    }))
}

fn parse_history(json: &str) -> Result<Vec<Message>, ApiError> {
    serde_json::from_str(json)
        .map_err(|e| ApiError::BadRequest(format!("invalid conversation_history: {e}")))
}

/// A transcription failure leaves the caller's history untouched: empty
/// transcription and reply, the error in its own field.
fn transcription_failure(history: Vec<Message>, detail: &str) -> AudioChatResponse {
    AudioChatResponse {
        transcription: String::new(),
        response: String::new(),
        conversation_history: history,
        error: Some(detail.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_ai::Role;

    #[test]
    fn history_parses_role_tagged_messages() {
        let history = parse_history(
            r#"[{"role": "user", "content": "hi"}, {"role": "assistant", "content": "hello"}]"#,
        )
        .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[test]
    fn malformed_history_is_a_bad_request() {
        let err = parse_history("not json").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = parse_history(r#"[{"role": "wizard", "content": "hi"}]"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn transcription_failure_keeps_history_unchanged() {
        let history = vec![Message::user("earlier"), Message::assistant("turn")];
        let response = transcription_failure(history.clone(), "could not understand audio");

        assert!(response.transcription.is_empty());
        assert!(response.response.is_empty());
        assert_eq!(response.error.as_deref(), Some("could not understand audio"));
        assert_eq!(response.conversation_history.len(), history.len());
        assert_eq!(response.conversation_history[0].content, "earlier");
    }
}
