//! Conversation session: the ordered transcript for one connection or one
//! stateless request.
//!
//! The transcript never stores a `system` entry — the tutor's system prompt
//! is injected at prompt-assembly time only. One session is owned by exactly
//! one connection task, so the type carries no locks.

use crate::{Message, Role};

/// Number of trailing messages sent upstream with each exchange.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Ordered transcript of user/assistant turns.
#[derive(Debug, Default)]
pub struct ConversationSession {
    messages: Vec<Message>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from caller-supplied history (the stateless
    /// surface). `system` entries are dropped to keep the invariant that the
    /// transcript only ever holds user/assistant turns.
    pub fn from_history(history: Vec<Message>) -> Self {
        Self {
            messages: history
                .into_iter()
                .filter(|m| m.role != Role::System)
                .collect(),
        }
    }

    /// Append one completed exchange: the user turn followed by the
    /// assistant turn.
    pub fn append_exchange(
        &mut self,
        user_content: impl Into<String>,
        assistant_content: impl Into<String>,
    ) {
        self.messages.push(Message::user(user_content));
        self.messages.push(Message::assistant(assistant_content));
    }

    /// Record a user turn that never got a reply. Whether to keep or roll
    /// back a half-exchange on failure is the caller's policy.
    pub fn append_user_only(&mut self, user_content: impl Into<String>) {
        self.messages.push(Message::user(user_content));
    }

    /// The most recent `limit` messages in chronological order. Does not
    /// mutate the transcript; used only for prompt assembly.
    pub fn windowed_history(&self, limit: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }

    /// Empty the transcript. Idempotent.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Full transcript in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchanges_alternate_user_assistant() {
        let mut session = ConversationSession::new();
        for i in 0..5 {
            session.append_exchange(format!("question {i}"), format!("answer {i}"));
        }

        assert_eq!(session.len(), 10);
        for (i, msg) in session.messages().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(msg.role, expected);
        }
    }

    #[test]
    fn window_returns_tail_in_order() {
        let mut session = ConversationSession::new();
        for i in 0..15 {
            session.append_exchange(format!("u{i}"), format!("a{i}"));
        }
        assert_eq!(session.len(), 30);

        let window = session.windowed_history(20);
        assert_eq!(window.len(), 20);
        assert_eq!(window[0].content, "u5");
        assert_eq!(window[19].content, "a14");
        // Read-only: the transcript is untouched.
        assert_eq!(session.len(), 30);
    }

    #[test]
    fn window_on_short_transcript_is_the_full_transcript() {
        let mut session = ConversationSession::new();
        session.append_exchange("hello", "hi there");

        let window = session.windowed_history(20);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].content, "hello");
        assert_eq!(window[1].content, "hi there");
    }

    #[test]
    fn clear_empties_and_is_idempotent() {
        let mut session = ConversationSession::new();
        session.append_exchange("u", "a");
        session.clear();
        assert!(session.is_empty());
        assert!(session.windowed_history(5).is_empty());

        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn append_user_only_records_the_lone_turn() {
        let mut session = ConversationSession::new();
        session.append_user_only("no reply came");

        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].role, Role::User);
    }

    #[test]
    fn from_history_drops_system_entries() {
        let history = vec![
            Message::system("you are a tutor"),
            Message::user("hello"),
            Message::assistant("hi"),
        ];
        let session = ConversationSession::from_history(history);

        assert_eq!(session.len(), 2);
        assert!(session.messages().iter().all(|m| m.role != Role::System));
    }
}
