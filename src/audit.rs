//! Append-only audit log (spec §6 "Audit log entry").

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The kind of state-changing action recorded in the audit log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    Placement,
    Retrieval,
    ManualPlace,
    Undocking,
    Import,
    Simulate,
}

/// One append-only audit record.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
    pub action_type: ActionType,
    pub item_id: Option<String>,
    pub details: String,
}

/// Criteria for filtering the audit log (spec §6: "Filterable by date
/// range, item, user, action").
#[derive(Clone, Debug, Default)]
pub struct AuditFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub item_id: Option<String>,
    pub user_id: Option<String>,
    pub action_type: Option<ActionType>,
}

impl AuditFilter {
    fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(from) = self.from {
            if entry.timestamp.date_naive() < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.timestamp.date_naive() > to {
                return false;
            }
        }
        if let Some(item_id) = &self.item_id {
            if entry.item_id.as_deref() != Some(item_id.as_str()) {
                return false;
            }
        }
        if let Some(user_id) = &self.user_id {
            if entry.user_id.as_deref() != Some(user_id.as_str()) {
                return false;
            }
        }
        if let Some(action_type) = self.action_type {
            if entry.action_type != action_type {
                return false;
            }
        }
        true
    }
}

/// An append-only log of audit entries, oldest first.
#[derive(Clone, Debug, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        timestamp: DateTime<Utc>,
        user_id: Option<String>,
        action_type: ActionType,
        item_id: Option<String>,
        details: impl Into<String>,
    ) {
        self.entries.push(AuditEntry {
            timestamp,
            user_id,
            action_type,
            item_id,
            details: details.into(),
        });
    }

    /// Returns matching entries, newest first, capped at `limit`.
    pub fn query(&self, filter: &AuditFilter, limit: usize) -> Vec<AuditEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| filter.matches(entry))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn system() -> Option<String> {
        Some("system".to_string())
    }

    #[test]
    fn test_query_filters_by_item_and_returns_newest_first() {
        let mut log = AuditLog::new();
        log.append(ts(2025, 1, 1), system(), ActionType::Placement, Some("A".into()), "placed A");
        log.append(ts(2025, 1, 2), system(), ActionType::Placement, Some("B".into()), "placed B");
        log.append(ts(2025, 1, 3), system(), ActionType::Retrieval, Some("A".into()), "retrieved A");

        let filter = AuditFilter {
            item_id: Some("A".into()),
            ..Default::default()
        };
        let results = log.query(&filter, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].action_type, ActionType::Retrieval);
        assert_eq!(results[1].action_type, ActionType::Placement);
    }

    #[test]
    fn test_query_respects_date_range() {
        let mut log = AuditLog::new();
        log.append(ts(2025, 1, 1), system(), ActionType::Import, None, "import 1");
        log.append(ts(2025, 2, 1), system(), ActionType::Import, None, "import 2");

        let filter = AuditFilter {
            from: Some(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()),
            ..Default::default()
        };
        let results = log.query(&filter, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].details, "import 2");
    }

    #[test]
    fn test_query_respects_limit() {
        let mut log = AuditLog::new();
        for day in 1..=5u32 {
            log.append(ts(2025, 1, day), system(), ActionType::Import, None, "import");
        }
        assert_eq!(log.query(&AuditFilter::default(), 2).len(), 2);
    }
}
