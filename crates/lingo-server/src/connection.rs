//! Per-connection WebSocket handler: one conversation session per socket.

use std::collections::VecDeque;
use std::pin::pin;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use lingo_ai::ConversationSession;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// What the read half produced.
enum Frame {
    Message(ClientMessage),
    Malformed(String),
    /// Ping/pong traffic; nothing to do at this layer.
    Control,
    Closed,
}

/// Handle a single WebSocket connection. The session lives exactly as long
/// as the socket; exchanges are processed strictly in arrival order.
pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();

    let Some(service) = state.tutor else {
        let _ = send_message(
            &mut sink,
            &ServerMessage::Error {
                message: "Chatbot not configured".into(),
            },
        )
        .await;
        let _ = sink.close().await;
        return;
    };

    tracing::info!(conn = %conn, "WebSocket client connected");

    let mut session = ConversationSession::new();
    // Frames that arrived while an exchange was in flight, replayed in order.
    let mut pending: VecDeque<ClientMessage> = VecDeque::new();

    'conn: loop {
        let msg = match pending.pop_front() {
            Some(msg) => msg,
            None => match read_frame(&mut stream).await {
                Frame::Message(msg) => msg,
                Frame::Malformed(detail) => {
                    if send_error(&mut sink, detail).await.is_err() {
                        break;
                    }
                    continue;
                }
                Frame::Control => continue,
                Frame::Closed => break,
            },
        };

        match msg {
            ClientMessage::TextMessage { content } => {
                // Race the exchange against the socket: a close observed
                // mid-exchange drops the in-flight future before it can
                // append, and other frames are buffered for later.
                let reply = {
                    let mut respond = pin!(service.exchange.respond(&mut session, &content));
                    loop {
                        tokio::select! {
                            reply = &mut respond => break reply,
                            frame = stream.next() => match parse_frame(frame) {
                                Frame::Message(msg) => pending.push_back(msg),
                                Frame::Malformed(detail) => {
                                    if send_error(&mut sink, detail).await.is_err() {
                                        break 'conn;
                                    }
                                }
                                Frame::Control => {}
                                Frame::Closed => {
                                    tracing::debug!(conn = %conn, "closed mid-exchange, reply discarded");
                                    break 'conn;
                                }
                            },
                        }
                    }
                };

                let response = ServerMessage::ChatResponse {
                    user_message: content,
                    ai_response: reply,
                    conversation_history: session.messages().to_vec(),
                };
                if send_message(&mut sink, &response).await.is_err() {
                    break;
                }
            }
            ClientMessage::ClearHistory => {
                session.clear();
                let response = ServerMessage::HistoryCleared {
                    message: "History cleared".into(),
                };
                if send_message(&mut sink, &response).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!(conn = %conn, transcript_len = session.len(), "WebSocket client disconnected");
}

/// Read the next client frame, skipping ping/pong traffic.
async fn read_frame(stream: &mut SplitStream<WebSocket>) -> Frame {
    loop {
        match parse_frame(stream.next().await) {
            Frame::Control => continue,
            frame => return frame,
        }
    }
}

/// Classify one raw frame.
fn parse_frame(frame: Option<Result<Message, axum::Error>>) -> Frame {
    match frame {
        Some(Ok(Message::Text(text))) => {
            match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(msg) => Frame::Message(msg),
                Err(e) => Frame::Malformed(format!("invalid message: {e}")),
            }
        }
        Some(Ok(Message::Binary(_))) => Frame::Malformed("expected a text frame".into()),
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => Frame::Control,
        Some(Ok(Message::Close(_))) | None => Frame::Closed,
        Some(Err(e)) => {
            tracing::debug!(error = %e, "WS read error");
            Frame::Closed
        }
    }
}

async fn send_error(
    sink: &mut SplitSink<WebSocket, Message>,
    detail: String,
) -> Result<(), axum::Error> {
    send_message(sink, &ServerMessage::Error { message: detail }).await
}

/// Send a ServerMessage as a JSON text frame.
async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(message).expect("serializable frame");
    sink.send(Message::Text(json.into())).await
}
