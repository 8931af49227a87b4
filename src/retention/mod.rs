//! Retention policy
//!
//! Bounds the dataset history: only the most recent records survive, every
//! older record is evicted (its blob and metadata are permanently deleted by
//! the pipeline). The decision itself is a pure partition so it can be tested
//! without storage; execution happens inside the pipeline's ingest critical
//! section.

use crate::models::{DatasetId, DatasetRecord};

/// Outcome of a retention decision.
#[derive(Debug, Clone)]
pub struct RetentionDecision {
    /// Ids of the records that stay, most recent first.
    pub keep: Vec<DatasetId>,
    /// Records scheduled for destructive eviction.
    pub evict: Vec<DatasetRecord>,
}

/// Keeps the N most recent dataset records.
///
/// Recency is creation time; identical timestamps are broken by the higher
/// identifier. Deciding twice over the same record set yields the same keep
/// set and an empty evict set the second time, so enforcement is idempotent.
pub struct RetentionPolicy {
    bound: usize,
}

impl RetentionPolicy {
    /// History window the product ships with.
    pub const DEFAULT_BOUND: usize = 5;

    pub fn new() -> Self {
        Self::with_bound(Self::DEFAULT_BOUND)
    }

    pub fn with_bound(bound: usize) -> Self {
        Self { bound }
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Partition the current record set into keep and evict sets.
    pub fn decide(&self, records: &[DatasetRecord]) -> RetentionDecision {
        let mut ordered: Vec<&DatasetRecord> = records.iter().collect();
        ordered.sort_by_key(|r| std::cmp::Reverse(r.recency_key()));

        let keep = ordered
            .iter()
            .take(self.bound)
            .map(|r| r.id)
            .collect();
        let evict = ordered
            .iter()
            .skip(self.bound)
            .map(|r| (*r).clone())
            .collect();

        RetentionDecision { keep, evict }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlobRef;
    use chrono::{Duration, Utc};

    fn record(id: DatasetId, offset_secs: i64) -> DatasetRecord {
        DatasetRecord {
            id,
            blob: BlobRef::new(format!("{id}.csv")),
            created_at: Utc::now() + Duration::seconds(offset_secs),
            summary: None,
        }
    }

    #[test]
    fn test_under_bound_evicts_nothing() {
        let records: Vec<_> = (1..=3).map(|i| record(i, i as i64)).collect();
        let decision = RetentionPolicy::new().decide(&records);
        assert_eq!(decision.keep.len(), 3);
        assert!(decision.evict.is_empty());
    }

    #[test]
    fn test_oldest_records_are_evicted() {
        let records: Vec<_> = (1..=7).map(|i| record(i, i as i64)).collect();
        let decision = RetentionPolicy::new().decide(&records);

        assert_eq!(decision.keep, vec![7, 6, 5, 4, 3]);
        let evicted: Vec<_> = decision.evict.iter().map(|r| r.id).collect();
        assert_eq!(evicted, vec![2, 1]);
    }

    #[test]
    fn test_timestamp_ties_favor_higher_id() {
        let now = Utc::now();
        let mut records: Vec<_> = (1..=6)
            .map(|i| DatasetRecord {
                id: i,
                blob: BlobRef::new(format!("{i}.csv")),
                created_at: now,
                summary: None,
            })
            .collect();
        // Shuffle the input order to prove ordering comes from the key.
        records.swap(0, 4);

        let decision = RetentionPolicy::new().decide(&records);
        assert_eq!(decision.keep, vec![6, 5, 4, 3, 2]);
        assert_eq!(decision.evict[0].id, 1);
    }

    #[test]
    fn test_decision_is_idempotent() {
        let records: Vec<_> = (1..=8).map(|i| record(i, i as i64)).collect();
        let policy = RetentionPolicy::new();
        let first = policy.decide(&records);

        let survivors: Vec<_> = records
            .iter()
            .filter(|r| first.keep.contains(&r.id))
            .cloned()
            .collect();
        let second = policy.decide(&survivors);

        assert_eq!(second.keep, first.keep);
        assert!(second.evict.is_empty());
    }
}
