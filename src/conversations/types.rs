//! Types for the conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answer::types::Mode;

/// One persisted question/answer pair.
///
/// Exchanges are append-only: once recorded they are never mutated or
/// deleted by this subsystem.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// The question as submitted.
    pub question: String,
    /// The resolved answer text.
    pub answer: String,
    /// Persona mode the exchange was answered under.
    pub mode: Mode,
    /// Owning user identifier; `None` for anonymous callers.
    pub owner: Option<String>,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
}

impl Exchange {
    /// Create a new exchange stamped with the current time.
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        mode: Mode,
        owner: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            mode,
            owner,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_distinct_ids() {
        let first = Exchange::new("q", "a", Mode::Patient, None);
        let second = Exchange::new("q", "a", Mode::Patient, None);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_exchange_serializes_camel_case() {
        let exchange = Exchange::new("q", "a", Mode::Doctor, Some("user-1".to_string()));
        let json = serde_json::to_value(&exchange).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json.get("mode").and_then(|m| m.as_str()), Some("doctor"));
        assert_eq!(json.get("owner").and_then(|o| o.as_str()), Some("user-1"));
    }

    #[test]
    fn test_exchange_round_trips() {
        let exchange = Exchange::new("q", "a", Mode::Patient, None);
        let json = serde_json::to_string(&exchange).unwrap();
        let restored: Exchange = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, exchange.id);
        assert!(restored.owner.is_none());
    }
}
