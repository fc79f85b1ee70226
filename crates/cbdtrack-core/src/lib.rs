//! Core engine for the CBD novel food applications tracker.
//!
//! This crate provides:
//! - Feed ingestion: CSV parsing, date coercion, manufacturer alias cleanup
//! - Rule-based product categorization with a refinement pass
//! - Analytics over one refresh cycle's worth of applications
//! - Plotly-compatible figure construction for the dashboard

pub mod analytics;
pub mod category;
pub mod chart;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod record;

pub use analytics::{
    CompletionProjection, CountEntry, DatasetSummary, DoseDistribution, TopManufacturers,
};
pub use category::ProductCategory;
pub use chart::Figure;
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use record::{ApplicationRecord, ApplicationStatus};
