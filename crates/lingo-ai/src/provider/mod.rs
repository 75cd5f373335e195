//! Chat-completions client (OpenAI-compatible wire format).
//!
//! One client covers every supported vendor — endpoint, credential, and
//! model are configuration, not code paths. Implements the
//! `CompletionProvider` trait.

mod api;
mod client;
mod config;

pub use client::ChatClient;
pub use config::{ChatConfig, Vendor};
