//! Tutor exchange: one user utterance in, one assistant reply out.
//!
//! Assembles the prompt (persona + windowed history + new turn), delegates
//! to the completion provider, and appends the finished exchange to the
//! session. Provider failures are folded into the transcript as a synthetic
//! assistant turn instead of being raised — the caller always gets a reply.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::session::{ConversationSession, DEFAULT_HISTORY_WINDOW};
use crate::{CompletionProvider, Message};

/// Fixed persona and response format for the English tutor.
pub const TUTOR_SYSTEM_PROMPT: &str = "\
You are an English conversation tutor. Analyze the user's sentence.

If the sentence is correct:
- Say: \"✅ Looks good!\"
- Suggest ONE natural alternative.
- Ask a simple follow-up question.

If the sentence has mistakes:
- Show:
  ✅ Corrected Sentence: [Correction]
  ❌ Mistake(s): List the grammar mistakes (e.g., wrong tense, missing article)
  💡 Alternatives:
    - [Alternative 1]
    - [Alternative 2]
- Ask a follow-up question.

Format:
✅ Corrected Sentence: ...
❌ Mistake(s): ...
💡 Alternatives:
- ...
- ...
❓ Follow-up question";

/// Drives tutor exchanges against a completion provider.
pub struct TutorExchange {
    provider: Arc<dyn CompletionProvider>,
    system_prompt: String,
    history_window: usize,
}

impl TutorExchange {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            system_prompt: TUTOR_SYSTEM_PROMPT.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Run one exchange. The session is only mutated after the provider call
    /// resolves, so dropping the returned future mid-flight (peer
    /// disconnected) leaves the transcript untouched.
    pub async fn respond(&self, session: &mut ConversationSession, utterance: &str) -> String {
        let prompt = self.build_prompt(session, utterance);
        debug!(messages = prompt.len(), "completion request");

        let reply = match self.provider.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "completion failed, replying with diagnostic");
                format!("Error generating response: {e}")
            }
        };

        session.append_exchange(utterance, &reply);
        reply
    }

    fn build_prompt(&self, session: &ConversationSession, utterance: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history_window + 2);
        messages.push(Message::system(&self.system_prompt));
        messages.extend_from_slice(session.windowed_history(self.history_window));
        messages.push(Message::user(utterance));
        messages
    }
}
