//! Application records and their statuses.

use std::fmt;

use chrono::NaiveDate;

use crate::category::ProductCategory;

/// Processing status of a novel food application, as reported by the feed.
///
/// The feed uses three well-known values; anything else is preserved verbatim
/// so new upstream statuses flow through rather than disappearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationStatus {
    /// Application accepted into the risk assessment phase.
    Validated,
    /// Application still waiting on supporting evidence.
    AwaitingEvidence,
    /// Application rejected; the product may not be sold.
    Removed,
    /// Any status string the feed reports that is not one of the above.
    Other(String),
}

impl ApplicationStatus {
    /// Parse a raw status field from the feed.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Validated" => Self::Validated,
            "Awaiting evidence" => Self::AwaitingEvidence,
            "Removed" => Self::Removed,
            other => Self::Other(other.to_string()),
        }
    }

    /// The label as it appears in the feed and on the dashboard.
    pub fn label(&self) -> &str {
        match self {
            Self::Validated => "Validated",
            Self::AwaitingEvidence => "Awaiting evidence",
            Self::Removed => "Removed",
            Self::Other(label) => label,
        }
    }

    /// Whether the application has reached a terminal status.
    ///
    /// Validated and Removed applications are done; everything else still
    /// counts toward the processing backlog.
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Validated | Self::Removed)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the feed: a single product's application.
///
/// Identity is implicit row identity from the source; the feed enforces no
/// primary key and neither do we.
#[derive(Debug, Clone)]
pub struct ApplicationRecord {
    /// Manufacturer or supplier name, after alias normalization.
    pub manufacturer: String,
    /// Free-text product name, the primary classification signal.
    pub product_name: String,
    /// Free-text size/volume/quantity, the secondary classification signal.
    pub product_size: String,
    /// Current processing status.
    pub status: ApplicationStatus,
    /// Date the application last changed; `None` if the feed value did not
    /// parse as a date.
    pub last_updated: Option<NaiveDate>,
    /// Category assigned by the classifier during load.
    pub category: ProductCategory,
}
