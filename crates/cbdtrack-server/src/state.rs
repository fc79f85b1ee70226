//! Shared dashboard state.
//!
//! The current dataset and everything derived from it live in one immutable
//! [`Snapshot`] behind `RwLock<Arc<..>>`. Readers clone the `Arc` under a
//! brief read lock and then work lock-free on a consistent view; the
//! refresher builds a whole new snapshot and swaps it in, so a refresh can
//! never expose a torn table to an in-flight request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use cbdtrack_core::analytics::{self, DatasetSummary};
use cbdtrack_core::chart::{self, Figure};
use cbdtrack_core::dataset::Dataset;

/// One refresh cycle's dataset plus everything precomputed from it.
#[derive(Debug)]
pub struct Snapshot {
    pub dataset: Dataset,
    pub summary: DatasetSummary,
    /// Distinct manufacturer names, sorted, for the dropdown.
    pub manufacturers: Vec<String>,
    pub charts: ChartSet,
}

impl Snapshot {
    /// Run the full analytics pipeline over a freshly loaded dataset.
    pub fn build(dataset: Dataset) -> Self {
        let summary = analytics::summarize(&dataset);
        let manufacturers = dataset.manufacturers();
        let charts = ChartSet::build(&dataset);
        Self {
            dataset,
            summary,
            manufacturers,
            charts,
        }
    }
}

/// The five precomputed dashboard figures, keyed by panel id on the page.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSet {
    pub projection: Figure,
    pub top_applications: Figure,
    pub top_validated: Figure,
    pub categories: Figure,
    pub dosages: Figure,
}

impl ChartSet {
    fn build(dataset: &Dataset) -> Self {
        let projection = analytics::completion_projection(dataset);
        let daily = analytics::daily_dispositions(dataset);
        let projection_title = match projection {
            Some(p) => format!(
                "At the current rate of validating or removing applications \
                 all applications will be processed by <b>{}</b>",
                p.predicted_finish.format("%d/%m/%y")
            ),
            None => "Not enough processing history yet to project a completion date".to_string(),
        };

        let top_apps = analytics::top_manufacturers(dataset);
        let top_apps_title = format!(
            "<b>{}</b> companies are responsible for <b>{:.1}%</b> of all applications",
            top_apps.entries.len(),
            top_apps.share_pct
        );

        let top_validated = analytics::top_validated_manufacturers(dataset);
        let top_validated_title = format!(
            "Of <b>{}</b> validated applications, <b>{}</b> companies hold <b>{:.1}%</b>",
            top_validated.total,
            top_validated.entries.len(),
            top_validated.share_pct
        );

        let categories = analytics::category_distribution(dataset);
        let categories_title = match categories.first().filter(|leader| leader.count > 0) {
            Some(leader) => format!(
                "<b>{}</b> products make up the bulk of CBD novel food applications",
                leader.label
            ),
            None => "Product categories across applications".to_string(),
        };

        let doses = analytics::dose_distribution(dataset);
        let doses_title = match doses.most_common_mg {
            Some(mg) => format!(
                "<b>{mg}mg</b> is the most common amount found in CBD products"
            ),
            None => "No dosage information found in product names".to_string(),
        };

        Self {
            projection: chart::line_chart(
                &daily,
                &projection_title,
                "",
                "Number of<br> validated and removed applications",
            ),
            top_applications: chart::bar_chart(
                &top_apps.entries,
                &top_apps_title,
                "Company name",
                "Number of applications",
            ),
            top_validated: chart::bar_chart(
                &top_validated.entries,
                &top_validated_title,
                "Company name",
                "Number of applications",
            ),
            categories: chart::bar_chart(
                &categories,
                &categories_title,
                "Product type",
                "Number of products",
            ),
            dosages: chart::bar_chart(
                &doses.entries,
                &doses_title,
                "Amount (mg)",
                "Number of products",
            ),
        }
    }
}

/// Refresh bookkeeping surfaced by the summary endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FeedHealth {
    /// Completion time of the last successful load.
    pub last_success: Option<DateTime<Utc>>,
    /// True until the first successful load, and again after any failed one.
    pub stale: bool,
    pub consecutive_failures: u32,
}

impl Default for FeedHealth {
    fn default() -> Self {
        Self {
            last_success: None,
            stale: true,
            consecutive_failures: 0,
        }
    }
}

/// Process-wide state shared by the handlers and the refresher.
pub struct AppState {
    snapshot: RwLock<Arc<Snapshot>>,
    health: RwLock<FeedHealth>,
    /// Feed endpoint the refresher polls.
    pub source_url: String,
}

impl AppState {
    /// State with an empty snapshot; the initial load fills it in.
    pub fn new(source_url: String) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::build(Dataset::empty()))),
            health: RwLock::new(FeedHealth::default()),
            source_url,
        }
    }

    /// The current consistent view.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().await.clone()
    }

    /// Swap in a freshly loaded dataset and mark the feed healthy.
    pub async fn install(&self, dataset: Dataset) {
        let fetched_at = dataset.fetched_at;
        let next = Arc::new(Snapshot::build(dataset));
        *self.snapshot.write().await = next;

        let mut health = self.health.write().await;
        health.last_success = Some(fetched_at);
        health.stale = false;
        health.consecutive_failures = 0;
    }

    /// Note a failed refresh; the current snapshot stays in place.
    pub async fn record_failure(&self) {
        let mut health = self.health.write().await;
        health.stale = true;
        health.consecutive_failures += 1;
    }

    pub async fn health(&self) -> FeedHealth {
        self.health.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cbdtrack_core::category::ProductCategory;
    use cbdtrack_core::record::{ApplicationRecord, ApplicationStatus};

    fn sample_dataset() -> Dataset {
        Dataset::new(vec![ApplicationRecord {
            manufacturer: "Acme".to_string(),
            product_name: "CBD Oil 500mg".to_string(),
            product_size: "10ml".to_string(),
            status: ApplicationStatus::Validated,
            last_updated: NaiveDate::from_ymd_opt(2023, 6, 12),
            category: ProductCategory::Oil,
        }])
    }

    #[tokio::test]
    async fn test_starts_empty_and_stale() {
        let state = AppState::new("http://feed.test/listing.csv".to_string());
        assert!(state.snapshot().await.dataset.is_empty());
        let health = state.health().await;
        assert!(health.stale);
        assert_eq!(health.last_success, None);
    }

    #[tokio::test]
    async fn test_install_swaps_snapshot_and_clears_staleness() {
        let state = AppState::new("http://feed.test/listing.csv".to_string());
        state.record_failure().await;
        state.install(sample_dataset()).await;

        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.dataset.len(), 1);
        assert_eq!(snapshot.summary.applications, 1);
        assert_eq!(snapshot.manufacturers, vec!["Acme"]);

        let health = state.health().await;
        assert!(!health.stale);
        assert_eq!(health.consecutive_failures, 0);
        assert!(health.last_success.is_some());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_snapshot() {
        let state = AppState::new("http://feed.test/listing.csv".to_string());
        state.install(sample_dataset()).await;
        state.record_failure().await;
        state.record_failure().await;

        // Data survives, staleness is flagged.
        assert_eq!(state.snapshot().await.dataset.len(), 1);
        let health = state.health().await;
        assert!(health.stale);
        assert_eq!(health.consecutive_failures, 2);
    }

    #[tokio::test]
    async fn test_readers_keep_their_snapshot_across_a_swap() {
        let state = AppState::new("http://feed.test/listing.csv".to_string());
        state.install(sample_dataset()).await;

        let before = state.snapshot().await;
        state.install(Dataset::empty()).await;
        let after = state.snapshot().await;

        // The old Arc still points at the old table.
        assert_eq!(before.dataset.len(), 1);
        assert_eq!(after.dataset.len(), 0);
    }

    #[test]
    fn test_chart_set_titles_embed_computed_numbers() {
        let charts = ChartSet::build(&sample_dataset());
        let json = serde_json::to_value(&charts).unwrap();
        let title = json["top_validated"]["layout"]["title"]["text"]
            .as_str()
            .unwrap();
        assert!(title.contains("<b>1</b> validated applications"));
        let dose_title = json["dosages"]["layout"]["title"]["text"].as_str().unwrap();
        assert!(dose_title.contains("500mg"));
    }

    #[test]
    fn test_chart_set_degenerate_titles() {
        let charts = ChartSet::build(&Dataset::empty());
        let json = serde_json::to_value(&charts).unwrap();
        let title = json["projection"]["layout"]["title"]["text"].as_str().unwrap();
        assert!(title.contains("Not enough processing history"));
        let dose_title = json["dosages"]["layout"]["title"]["text"].as_str().unwrap();
        assert!(dose_title.contains("No dosage information"));
    }
}
