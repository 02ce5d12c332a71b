//! Builds the turn history that accompanies a new message to the
//! model.
//!
//! The message log passed in always ends with the user message that
//! was just saved. That message is sent separately as the current
//! turn, so it must never also appear in the history.
use serde::Serialize;

use super::models::{ChatMessage, MessageRole};

/// Maximum number of trailing messages considered for context
pub const DEFAULT_CONTEXT_CAP: usize = 20;

/// Role vocabulary of the generative API
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub enum TurnRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "model")]
    Model,
}

impl From<MessageRole> for TurnRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => TurnRole::User,
            MessageRole::Assistant => TurnRole::Model,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn new(role: TurnRole, text: &str) -> Self {
        Self {
            role,
            text: text.to_string(),
        }
    }
}

impl From<&ChatMessage> for Turn {
    fn from(msg: &ChatMessage) -> Self {
        Turn::new(msg.role.into(), &msg.content)
    }
}

/// Returns the prior turns for the last message in `log`.
///
/// Only the most recent `cap` messages are considered and the cap is
/// applied before the final message is dropped, so a log longer than
/// `cap` yields `cap - 1` turns.
pub fn assemble_context(log: &[ChatMessage], cap: usize) -> Vec<Turn> {
    let start = log.len().saturating_sub(cap);
    match log[start..].split_last() {
        Some((_current, prior)) => prior.iter().map(Turn::from).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(idx: usize, role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage {
            id: format!("m{}", idx),
            chat_id: String::from("c1"),
            role,
            content: content.to_string(),
            created_at: format!("2025-01-01T00:00:{:02}.000000Z", idx),
        }
    }

    fn alternating_log(len: usize) -> Vec<ChatMessage> {
        (0..len)
            .map(|i| {
                let role = if i % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                };
                msg(i, role, &format!("message {}", i))
            })
            .collect()
    }

    #[test]
    fn it_returns_no_context_for_a_new_chat() {
        let log = vec![msg(0, MessageRole::User, "hi")];
        assert!(assemble_context(&log, DEFAULT_CONTEXT_CAP).is_empty());
    }

    #[test]
    fn it_returns_no_context_for_an_empty_log() {
        assert!(assemble_context(&[], DEFAULT_CONTEXT_CAP).is_empty());
        assert!(assemble_context(&alternating_log(3), 0).is_empty());
    }

    #[test]
    fn it_excludes_the_current_message_and_maps_roles() {
        let log = vec![
            msg(0, MessageRole::User, "a"),
            msg(1, MessageRole::Assistant, "b"),
            msg(2, MessageRole::User, "c"),
        ];
        let context = assemble_context(&log, 20);
        assert_eq!(
            context,
            vec![Turn::new(TurnRole::User, "a"), Turn::new(TurnRole::Model, "b")]
        );
    }

    #[test]
    fn it_keeps_all_prior_messages_under_the_cap() {
        let log = alternating_log(20);
        let context = assemble_context(&log, 20);
        assert_eq!(context.len(), 19);
        assert_eq!(context.first().unwrap().text, "message 0");
        assert_eq!(context.last().unwrap().text, "message 18");
    }

    #[test]
    fn it_truncates_before_excluding_the_current_message() {
        let log = alternating_log(25);
        let context = assemble_context(&log, 20);
        assert_eq!(context.len(), 19);
        let expected: Vec<String> = (5..24).map(|i| format!("message {}", i)).collect();
        let actual: Vec<String> = context.iter().map(|t| t.text.clone()).collect();
        assert_eq!(actual, expected);
        assert!(!actual.contains(&String::from("message 24")));
    }

    #[test]
    fn it_only_emits_user_and_model_roles() {
        let log = alternating_log(7);
        let context = assemble_context(&log, 20);
        for (turn, source) in context.iter().zip(log.iter()) {
            let expected = match source.role {
                MessageRole::User => TurnRole::User,
                MessageRole::Assistant => TurnRole::Model,
            };
            assert_eq!(turn.role, expected);
        }
        let json = serde_json::to_string(&TurnRole::Model).unwrap();
        assert_eq!(json, "\"model\"");
    }
}
