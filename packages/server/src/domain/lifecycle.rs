//! Pure lifecycle decision logic for the disconnect grace period.
//!
//! These functions have no side effects, so the re-check that runs when the
//! grace timer fires can be tested without timers or shared state.

use super::{Conversation, ConversationStatus, Message};

/// Return `true` if any message in the log is strictly newer than
/// `threshold_millis`.
pub fn has_message_since(messages: &[Message], threshold_millis: i64) -> bool {
    messages.iter().any(|msg| msg.timestamp > threshold_millis)
}

/// Decide whether a conversation should transition to `inactive` when the
/// grace-period check fires.
///
/// A conversation is marked inactive only if it is still `active` and no
/// message falls inside the grace window counted back from `fired_at_millis`.
/// A conversation that saw traffic during the window (for example the visitor
/// reconnected briefly) is left untouched; the status never reverts once
/// inactive, so an already-inactive record is never re-marked.
pub fn should_mark_inactive(
    conversation: &Conversation,
    fired_at_millis: i64,
    grace_millis: i64,
) -> bool {
    conversation.status == ConversationStatus::Active
        && !has_message_since(&conversation.messages, fired_at_millis - grace_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, MessageText, Sender};

    fn conversation_with_message_at(timestamp: i64) -> Conversation {
        let mut conversation = Conversation::new(
            ConnectionId::new(),
            "Bob".to_string(),
            "b@x.com".to_string(),
            timestamp,
        );
        let text = MessageText::new("hello".to_string()).unwrap();
        conversation.append_message(Message::new(text, Sender::Client, timestamp));
        conversation
    }

    #[test]
    fn test_has_message_since_with_empty_log() {
        // テスト項目: メッセージログが空の場合、常に false が返される
        // given (前提条件):
        let messages = vec![];

        // when (操作):
        let result = has_message_since(&messages, 1000);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_has_message_since_with_newer_message() {
        // テスト項目: しきい値より新しいメッセージがある場合、true が返される
        // given (前提条件):
        let conversation = conversation_with_message_at(2000);

        // when (操作):
        let result = has_message_since(&conversation.messages, 1000);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_has_message_since_with_older_message() {
        // テスト項目: しきい値より古いメッセージしかない場合、false が返される
        // given (前提条件):
        let conversation = conversation_with_message_at(500);

        // when (操作):
        let result = has_message_since(&conversation.messages, 1000);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_has_message_since_is_strictly_newer() {
        // テスト項目: しきい値と同時刻のメッセージは「新しい」と判定されない
        // given (前提条件):
        let conversation = conversation_with_message_at(1000);

        // when (操作):
        let result = has_message_since(&conversation.messages, 1000);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_mark_inactive_for_idle_conversation() {
        // テスト項目: 猶予期間内にメッセージがない active な会話は inactive 対象になる
        // given (前提条件):
        let conversation = conversation_with_message_at(1_000);
        let fired_at = 400_000;
        let grace = 300_000;

        // when (操作):
        let result = should_mark_inactive(&conversation, fired_at, grace);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_not_mark_inactive_with_recent_message() {
        // テスト項目: 猶予期間内にメッセージがある会話は inactive 対象にならない
        // given (前提条件):
        let conversation = conversation_with_message_at(350_000);
        let fired_at = 400_000;
        let grace = 300_000;

        // when (操作):
        let result = should_mark_inactive(&conversation, fired_at, grace);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_mark_inactive_when_already_inactive() {
        // テスト項目: 既に inactive な会話は再度 inactive 対象にならない
        // given (前提条件):
        let mut conversation = conversation_with_message_at(1_000);
        conversation.status = ConversationStatus::Inactive;

        // when (操作):
        let result = should_mark_inactive(&conversation, 400_000, 300_000);

        // then (期待する結果):
        assert!(!result);
    }
}
