//! Unread snapshot value type.

use serde::{Deserialize, Serialize};

/// Unread totals: messages and contacts with at least one unread message.
///
/// Both fields are unsigned. `contacts_with_unread > total` can occur between
/// server resyncs and is tolerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadSnapshot {
    pub total: u64,
    pub contacts_with_unread: u64,
}

impl UnreadSnapshot {
    pub fn new(total: u64, contacts_with_unread: u64) -> Self {
        Self {
            total,
            contacts_with_unread,
        }
    }

    /// One more inbound message; counted as one more unread contact without
    /// checking whether the contact already had unread messages.
    pub fn incremented(self) -> Self {
        Self {
            total: self.total.saturating_add(1),
            contacts_with_unread: self.contacts_with_unread.saturating_add(1),
        }
    }

    /// A conversation with `count` unread messages was read.
    pub fn decremented(self, count: u64) -> Self {
        Self {
            total: self.total.saturating_sub(count),
            contacts_with_unread: self.contacts_with_unread.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incremented_bumps_both_fields() {
        // テスト項目: 受信時は両方のカウントが 1 増える
        // given (前提条件):
        let snapshot = UnreadSnapshot::new(3, 1);

        // when (操作):
        let result = snapshot.incremented();

        // then (期待する結果):
        assert_eq!(result, UnreadSnapshot::new(4, 2));
    }

    #[test]
    fn test_decremented_never_goes_negative() {
        // テスト項目: どんな n でも負の値にならない
        // given (前提条件):
        let snapshot = UnreadSnapshot::new(2, 0);

        // when (操作):
        let result = snapshot.decremented(u64::MAX);

        // then (期待する結果):
        assert_eq!(result, UnreadSnapshot::new(0, 0));
    }

    #[test]
    fn test_decremented_counts_one_contact() {
        // テスト項目: 既読化は会話 1 件分の連絡先として数えられる
        // given (前提条件):
        let snapshot = UnreadSnapshot::new(10, 3);

        // when (操作):
        let result = snapshot.decremented(4);

        // then (期待する結果):
        assert_eq!(result, UnreadSnapshot::new(6, 2));
    }
}
