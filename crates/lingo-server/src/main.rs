//! lingo-server: English-conversation tutor backend.
//!
//! Relays typed or spoken user turns to a chat-completions provider and
//! answers with the tutor's reply plus the running transcript. Two
//! caller-facing surfaces: a stateless audio exchange (`POST /chat/audio`)
//! and a persistent WebSocket chat (`/ws/chat`).

mod connection;
mod error;
mod protocol;
mod routes;
mod state;

use clap::Parser;
use tokio::net::TcpListener;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "lingo-server", about = "English conversation tutor backend")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingo_server=info".into()),
        )
        .init();

    let args = Args::parse();
    let state = AppState::from_env();
    if !state.configured() {
        tracing::warn!("no chat credential found; chat surfaces will answer 503");
    }

    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind TCP listener");

    tracing::info!("lingo-server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
