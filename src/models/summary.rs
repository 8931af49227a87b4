//! Summary model
//!
//! The summary is computed exactly once when a dataset is ingested and never
//! mutated afterwards. Its serialized field names (`total_count`, `averages`
//! with `Flowrate`/`Pressure`/`Temperature` keys, `type_distribution`) are a
//! stable contract that downstream consumers key off.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence count per distinct `Type` value, verbatim (no case folding or
/// trimming of the value). A `BTreeMap` keeps iteration deterministic.
pub type TypeDistribution = BTreeMap<String, u64>;

/// Per-column arithmetic means, rounded to 2 decimals.
///
/// Serialized with the capitalized column names other layers depend on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    #[serde(rename = "Flowrate")]
    pub flowrate: f64,
    #[serde(rename = "Pressure")]
    pub pressure: f64,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
}

impl Averages {
    pub fn zero() -> Self {
        Self {
            flowrate: 0.0,
            pressure: 0.0,
            temperature: 0.0,
        }
    }
}

/// Immutable statistics for one dataset.
///
/// Invariant: the `type_distribution` values sum to `total_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_count: u64,
    pub averages: Averages,
    pub type_distribution: TypeDistribution,
}

impl Summary {
    /// A summary for a dataset with no rows. Averages are reported as 0.0
    /// rather than refusing to summarize, so empty datasets still get reports.
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            averages: Averages::zero(),
            type_distribution: TypeDistribution::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// The distribution key with the maximum count, ties broken by the first
    /// key encountered in iteration order.
    pub fn dominant_type(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (name, &count) in &self.type_distribution {
            match best {
                Some((_, current)) if count <= current => {}
                _ => best = Some((name.as_str(), count)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names_are_stable() {
        let mut dist = TypeDistribution::new();
        dist.insert("Pump".to_string(), 2);
        let summary = Summary {
            total_count: 2,
            averages: Averages {
                flowrate: 5.0,
                pressure: 6.0,
                temperature: 22.5,
            },
            type_distribution: dist,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_count"], 2);
        assert_eq!(json["averages"]["Flowrate"], 5.0);
        assert_eq!(json["averages"]["Pressure"], 6.0);
        assert_eq!(json["averages"]["Temperature"], 22.5);
        assert_eq!(json["type_distribution"]["Pump"], 2);
    }

    #[test]
    fn test_dominant_type_breaks_ties_on_iteration_order() {
        let mut dist = TypeDistribution::new();
        dist.insert("Valve".to_string(), 3);
        dist.insert("Pump".to_string(), 3);
        dist.insert("Compressor".to_string(), 1);
        let summary = Summary {
            total_count: 7,
            averages: Averages::zero(),
            type_distribution: dist,
        };

        // BTreeMap iterates lexicographically, so "Pump" comes first.
        assert_eq!(summary.dominant_type(), Some(("Pump", 3)));
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::empty();
        assert!(summary.is_empty());
        assert_eq!(summary.dominant_type(), None);
    }
}
