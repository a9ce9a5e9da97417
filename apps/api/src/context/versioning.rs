use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::context::ConversationContext;

/// Session-local history of generated context summaries.
///
/// CRITICAL: append-only. A new summary supersedes the previous one; no entry
/// is ever edited or removed.
#[derive(Debug, Clone, Default)]
pub struct ContextHistory {
    entries: Vec<ConversationContext>,
}

impl ContextHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new summary with a fresh id and returns it.
    pub fn record(
        &mut self,
        summary: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> ConversationContext {
        let context = ConversationContext {
            id: Uuid::new_v4(),
            content: summary.into(),
            last_updated: timestamp,
        };
        self.entries.push(context.clone());
        context
    }

    pub fn current(&self) -> Option<&ConversationContext> {
        current(&self.entries)
    }

    /// All entries, most recent first.
    pub fn history(&self) -> Vec<&ConversationContext> {
        let mut ordered: Vec<_> = self.entries.iter().enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| ib.cmp(ia))
        });
        ordered.into_iter().map(|(_, c)| c).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Entry with the latest timestamp; on a tie the one inserted last wins.
/// `history` must be in insertion order.
pub fn current(history: &[ConversationContext]) -> Option<&ConversationContext> {
    history
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.last_updated.cmp(&b.last_updated).then_with(|| ia.cmp(ib)))
        .map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_empty_history_has_no_current() {
        let history = ContextHistory::new();
        assert!(history.current().is_none());
        assert!(history.history().is_empty());
    }

    #[test]
    fn test_latest_timestamp_is_current() {
        let mut history = ContextHistory::new();
        history.record("first", at(1));
        history.record("second", at(2));
        let third = history.record("third", at(3));
        assert_eq!(history.current(), Some(&third));
    }

    #[test]
    fn test_out_of_order_arrival_still_picks_latest_timestamp() {
        let mut history = ContextHistory::new();
        let latest = history.record("latest", at(30));
        history.record("stale", at(10));
        assert_eq!(history.current(), Some(&latest));
        let contents: Vec<_> = history.history().iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["latest", "stale"]);
    }

    #[test]
    fn test_tie_goes_to_later_insertion() {
        let mut history = ContextHistory::new();
        history.record("a", at(5));
        let b = history.record("b", at(5));
        assert_eq!(history.current(), Some(&b));
        assert_eq!(history.history()[0], &b);
    }

    #[test]
    fn test_record_appends_and_never_mutates() {
        let mut history = ContextHistory::new();
        let first = history.record("summary", at(1));
        let second = history.record("summary", at(2));
        assert_ne!(first.id, second.id);
        assert_eq!(history.len(), 2);
        assert_eq!(history.history()[1], &first);
    }
}
