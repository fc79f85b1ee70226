//! The in-memory table for one refresh cycle.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::record::ApplicationRecord;

/// All application records loaded in one refresh cycle.
///
/// A dataset is immutable once built. Each refresh builds a new one and the
/// server swaps it in wholesale; there is no incremental merge and nothing
/// survives a restart.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Fully categorized records, in feed order.
    pub records: Vec<ApplicationRecord>,
    /// When this cycle's load completed.
    pub fetched_at: DateTime<Utc>,
}

impl Dataset {
    /// Wrap loaded records, stamping the load time.
    pub fn new(records: Vec<ApplicationRecord>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
        }
    }

    /// An empty dataset, used at startup before the first successful fetch.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct manufacturer names, sorted.
    pub fn manufacturers(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.manufacturer.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Newest last-updated date across all records.
    pub fn latest_update(&self) -> Option<NaiveDate> {
        self.records.iter().filter_map(|r| r.last_updated).max()
    }

    /// Oldest last-updated date across all records.
    pub fn earliest_update(&self) -> Option<NaiveDate> {
        self.records.iter().filter_map(|r| r.last_updated).min()
    }
}
