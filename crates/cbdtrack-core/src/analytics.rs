//! Read-only computations over a dataset.
//!
//! Every function here tolerates an empty dataset: series come back empty
//! and the projection comes back `None` instead of anything failing.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::category::ProductCategory;
use crate::dataset::Dataset;
use crate::record::ApplicationStatus;

/// How many entries the ranked series keep.
const TOP_N: usize = 10;

/// Headline numbers for the page header and the dropdown placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    /// Total applications in the current cycle.
    pub applications: usize,
    /// Distinct manufacturer names.
    pub companies: usize,
    /// Newest last-updated date in the feed, if any date parsed.
    pub last_updated: Option<NaiveDate>,
}

/// One labeled count in a ranked or grouped series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

/// A ranked manufacturer list plus the share of the total it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct TopManufacturers {
    /// Up to ten entries, count descending, name ascending on ties.
    pub entries: Vec<CountEntry>,
    /// Denominator the share was computed against: all records, or all
    /// validated records, depending on the ranking.
    pub total: usize,
    /// Percentage of `total` covered by `entries`.
    pub share_pct: f64,
}

/// Dose frequency table plus the single most common dose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseDistribution {
    /// Up to ten doses, frequency descending, dose ascending on ties.
    /// Labels are the bare milligram numbers.
    pub entries: Vec<CountEntry>,
    pub most_common_mg: Option<u64>,
}

/// Forward projection of when the remaining applications clear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionProjection {
    /// Records not yet Validated or Removed.
    pub remaining: usize,
    /// Days spanned by the observed update dates.
    pub elapsed_days: i64,
    /// Remaining applications per elapsed day.
    pub per_day: f64,
    pub predicted_finish: NaiveDate,
}

/// Headline counts for the current dataset.
pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    DatasetSummary {
        applications: dataset.len(),
        companies: dataset.manufacturers().len(),
        last_updated: dataset.latest_update(),
    }
}

/// Top manufacturers by total application count.
pub fn top_manufacturers(dataset: &Dataset) -> TopManufacturers {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in &dataset.records {
        *counts.entry(record.manufacturer.as_str()).or_insert(0) += 1;
    }
    ranked(counts, dataset.len())
}

/// Top manufacturers by count of Validated applications.
///
/// The share is computed against the real Validated total across the whole
/// dataset, not just the listed entries.
pub fn top_validated_manufacturers(dataset: &Dataset) -> TopManufacturers {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total_validated = 0usize;
    for record in &dataset.records {
        if record.status == ApplicationStatus::Validated {
            *counts.entry(record.manufacturer.as_str()).or_insert(0) += 1;
            total_validated += 1;
        }
    }
    ranked(counts, total_validated)
}

fn ranked(counts: HashMap<&str, usize>, total: usize) -> TopManufacturers {
    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    pairs.truncate(TOP_N);
    let covered: usize = pairs.iter().map(|(_, count)| count).sum();
    let share_pct = if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64 * 100.0
    };
    TopManufacturers {
        entries: pairs
            .into_iter()
            .map(|(label, count)| CountEntry {
                label: label.to_string(),
                count,
            })
            .collect(),
        total,
        share_pct,
    }
}

/// Record count per category, every variant included even at zero.
///
/// Sorted by count descending; the sort is stable, so equal counts keep
/// declaration order and the chart axis stays put between refreshes.
pub fn category_distribution(dataset: &Dataset) -> Vec<CountEntry> {
    let mut counts: HashMap<ProductCategory, usize> = HashMap::new();
    for record in &dataset.records {
        *counts.entry(record.category).or_insert(0) += 1;
    }
    let mut entries: Vec<CountEntry> = ProductCategory::ALL
        .iter()
        .map(|category| CountEntry {
            label: category.label().to_string(),
            count: counts.get(category).copied().unwrap_or(0),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

static DOSE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*mg").expect("dose pattern is valid"));

/// Extract the integer milligram dose from free text, if present.
pub fn extract_dose_mg(text: &str) -> Option<u64> {
    DOSE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Dose frequency across product names.
///
/// Records with no milligram marker contribute nothing; they are not a
/// bucket of their own.
pub fn dose_distribution(dataset: &Dataset) -> DoseDistribution {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for record in &dataset.records {
        if let Some(dose) = extract_dose_mg(&record.product_name) {
            *counts.entry(dose).or_insert(0) += 1;
        }
    }
    let mut pairs: Vec<(u64, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let most_common_mg = pairs.first().map(|(dose, _)| *dose);
    pairs.truncate(TOP_N);
    DoseDistribution {
        entries: pairs
            .into_iter()
            .map(|(dose, count)| CountEntry {
                label: dose.to_string(),
                count,
            })
            .collect(),
        most_common_mg,
    }
}

/// Validated-or-Removed counts per day, ascending by date.
pub fn daily_dispositions(dataset: &Dataset) -> Vec<(NaiveDate, usize)> {
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in &dataset.records {
        if record.status.is_processed() {
            if let Some(date) = record.last_updated {
                *by_day.entry(date).or_insert(0) += 1;
            }
        }
    }
    by_day.into_iter().collect()
}

/// Project when the remaining applications will all be processed.
///
/// The rate is remaining applications over the observed date span, and the
/// finish date extrapolates that rate forward from the newest update.
/// Returns `None` when the dataset has no usable date range (empty feed, no
/// parseable dates, or a single-day span); an empty queue projects
/// completion at the newest update date.
pub fn completion_projection(dataset: &Dataset) -> Option<CompletionProjection> {
    let newest = dataset.latest_update()?;
    let oldest = dataset.earliest_update()?;
    let elapsed_days = (newest - oldest).num_days();
    if elapsed_days == 0 {
        return None;
    }
    let remaining = dataset
        .records
        .iter()
        .filter(|record| !record.status.is_processed())
        .count();
    let per_day = remaining as f64 / elapsed_days as f64;
    let days_required = if remaining == 0 {
        0.0
    } else {
        remaining as f64 / per_day
    };
    let predicted_finish = newest + Duration::days(days_required.round() as i64);
    Some(CompletionProjection {
        remaining,
        elapsed_days,
        per_day,
        predicted_finish,
    })
}

/// Status counts, optionally filtered to one manufacturer.
///
/// This is the pure half of the dashboard's reactive pie chart: the same
/// function serves the unfiltered breakdown and the per-company one.
/// Ordered count descending, label ascending on ties.
pub fn status_breakdown(dataset: &Dataset, manufacturer: Option<&str>) -> Vec<CountEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in &dataset.records {
        if let Some(name) = manufacturer {
            if record.manufacturer != name {
                continue;
            }
        }
        *counts.entry(record.status.label()).or_insert(0) += 1;
    }
    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    pairs
        .into_iter()
        .map(|(label, count)| CountEntry {
            label: label.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ApplicationRecord;

    fn record(
        manufacturer: &str,
        product_name: &str,
        status: ApplicationStatus,
        date: Option<NaiveDate>,
    ) -> ApplicationRecord {
        let category = crate::category::categorize(product_name);
        ApplicationRecord {
            manufacturer: manufacturer.to_string(),
            product_name: product_name.to_string(),
            product_size: String::new(),
            status,
            last_updated: date,
            category,
        }
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2023, 6, d)
    }

    #[test]
    fn test_summary_counts() {
        let dataset = Dataset::new(vec![
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Water", ApplicationStatus::Removed, day(3)),
            record("Zen", "CBD Gummies", ApplicationStatus::AwaitingEvidence, day(2)),
        ]);
        let summary = summarize(&dataset);
        assert_eq!(summary.applications, 3);
        assert_eq!(summary.companies, 2);
        assert_eq!(summary.last_updated, day(3));
    }

    #[test]
    fn test_top_manufacturers_ranking_and_share() {
        let mut records = Vec::new();
        for _ in 0..3 {
            records.push(record("Acme", "CBD Oil", ApplicationStatus::Validated, day(1)));
        }
        records.push(record("Zen", "CBD Oil", ApplicationStatus::Validated, day(1)));
        let dataset = Dataset::new(records);

        let top = top_manufacturers(&dataset);
        assert_eq!(top.entries[0].label, "Acme");
        assert_eq!(top.entries[0].count, 3);
        assert_eq!(top.entries[1].label, "Zen");
        assert_eq!(top.total, 4);
        assert!((top.share_pct - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_manufacturers_caps_at_ten_with_lexicographic_ties() {
        // Eleven manufacturers, all with one application apiece: the ranking
        // must keep exactly ten, in name order.
        let names = ["k", "j", "i", "h", "g", "f", "e", "d", "c", "b", "a"];
        let records = names
            .iter()
            .map(|name| record(name, "CBD Oil", ApplicationStatus::Validated, day(1)))
            .collect();
        let top = top_manufacturers(&Dataset::new(records));

        assert_eq!(top.entries.len(), 10);
        let labels: Vec<&str> = top.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
    }

    #[test]
    fn test_validated_ranking_uses_validated_denominator() {
        let dataset = Dataset::new(vec![
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(2)),
            record("Zen", "CBD Oil", ApplicationStatus::Validated, day(1)),
            record("Zen", "CBD Oil", ApplicationStatus::AwaitingEvidence, day(1)),
            record("Calm", "CBD Oil", ApplicationStatus::Removed, day(1)),
        ]);
        let top = top_validated_manufacturers(&dataset);
        // Three validated records total; Calm has none and must not appear.
        assert_eq!(top.total, 3);
        assert_eq!(top.entries.len(), 2);
        assert_eq!(top.entries[0].label, "Acme");
        assert_eq!(top.entries[0].count, 2);
        assert!((top.share_pct - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_distribution_includes_every_variant() {
        let dataset = Dataset::new(vec![
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Water", ApplicationStatus::Validated, day(1)),
            record("Acme", "Hemp oil drops", ApplicationStatus::Validated, day(1)),
        ]);
        let entries = category_distribution(&dataset);
        assert_eq!(entries.len(), ProductCategory::ALL.len());
        assert_eq!(entries[0].label, "Oil");
        assert_eq!(entries[0].count, 2);
        let isolate = entries.iter().find(|e| e.label == "Isolate").unwrap();
        assert_eq!(isolate.count, 0);
    }

    #[test]
    fn test_dose_extraction() {
        assert_eq!(extract_dose_mg("CBD Oil 500mg Spray"), Some(500));
        assert_eq!(extract_dose_mg("CBD Oil 500 mg Spray"), Some(500));
        assert_eq!(extract_dose_mg("CBD Oil 500MG"), Some(500));
        assert_eq!(extract_dose_mg("CBD Oil"), None);
        assert_eq!(extract_dose_mg(""), None);
    }

    #[test]
    fn test_dose_distribution_ranks_by_frequency() {
        let dataset = Dataset::new(vec![
            record("Acme", "CBD Oil 500mg", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Oil 500mg large", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Oil 1000mg", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Balm", ApplicationStatus::Validated, day(1)),
        ]);
        let doses = dose_distribution(&dataset);
        assert_eq!(doses.most_common_mg, Some(500));
        assert_eq!(doses.entries.len(), 2);
        assert_eq!(doses.entries[0].label, "500");
        assert_eq!(doses.entries[0].count, 2);
    }

    #[test]
    fn test_daily_dispositions_ascending_and_filtered() {
        let dataset = Dataset::new(vec![
            record("Acme", "CBD Oil", ApplicationStatus::Removed, day(9)),
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(2)),
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(9)),
            // Awaiting evidence is not a disposition.
            record("Acme", "CBD Oil", ApplicationStatus::AwaitingEvidence, day(5)),
            // No date, no bucket.
            record("Acme", "CBD Oil", ApplicationStatus::Validated, None),
        ]);
        let series = daily_dispositions(&dataset);
        assert_eq!(series, vec![(day(2).unwrap(), 1), (day(9).unwrap(), 2)]);
    }

    #[test]
    fn test_projection_math() {
        // Ten days of history, two open applications.
        let dataset = Dataset::new(vec![
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Oil", ApplicationStatus::Removed, day(11)),
            record("Acme", "CBD Oil", ApplicationStatus::AwaitingEvidence, day(4)),
            record("Acme", "CBD Oil", ApplicationStatus::AwaitingEvidence, day(6)),
        ]);
        let projection = completion_projection(&dataset).unwrap();
        assert_eq!(projection.remaining, 2);
        assert_eq!(projection.elapsed_days, 10);
        assert!((projection.per_day - 0.2).abs() < f64::EPSILON);
        // remaining / rate always equals the elapsed span when remaining > 0.
        assert_eq!(projection.predicted_finish, day(21).unwrap());
    }

    #[test]
    fn test_projection_with_empty_queue_finishes_now() {
        let dataset = Dataset::new(vec![
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Oil", ApplicationStatus::Removed, day(11)),
        ]);
        let projection = completion_projection(&dataset).unwrap();
        assert_eq!(projection.remaining, 0);
        assert_eq!(projection.predicted_finish, day(11).unwrap());
    }

    #[test]
    fn test_projection_degenerate_cases() {
        // Empty dataset.
        assert!(completion_projection(&Dataset::empty()).is_none());
        // No parseable dates.
        let no_dates = Dataset::new(vec![record(
            "Acme",
            "CBD Oil",
            ApplicationStatus::AwaitingEvidence,
            None,
        )]);
        assert!(completion_projection(&no_dates).is_none());
        // Single-day span.
        let single_day = Dataset::new(vec![
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Oil", ApplicationStatus::AwaitingEvidence, day(1)),
        ]);
        assert!(completion_projection(&single_day).is_none());
    }

    #[test]
    fn test_status_breakdown_filters_by_manufacturer() {
        let dataset = Dataset::new(vec![
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(1)),
            record("Acme", "CBD Oil", ApplicationStatus::Validated, day(2)),
            record("Acme", "CBD Oil", ApplicationStatus::Removed, day(3)),
            record("Zen", "CBD Oil", ApplicationStatus::AwaitingEvidence, day(1)),
        ]);

        // A company with only Validated and Removed records: exactly two
        // segments, summing to its record count.
        let acme = status_breakdown(&dataset, Some("Acme"));
        assert_eq!(acme.len(), 2);
        assert_eq!(acme.iter().map(|e| e.count).sum::<usize>(), 3);
        assert_eq!(acme[0].label, "Validated");
        assert_eq!(acme[0].count, 2);

        // No filter covers the whole table.
        let all = status_breakdown(&dataset, None);
        assert_eq!(all.iter().map(|e| e.count).sum::<usize>(), 4);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_everything_tolerates_an_empty_dataset() {
        let dataset = Dataset::empty();
        assert_eq!(summarize(&dataset).applications, 0);
        assert!(top_manufacturers(&dataset).entries.is_empty());
        assert!(top_validated_manufacturers(&dataset).entries.is_empty());
        assert!(dose_distribution(&dataset).entries.is_empty());
        assert!(daily_dispositions(&dataset).is_empty());
        assert!(status_breakdown(&dataset, None).is_empty());
        assert_eq!(category_distribution(&dataset).len(), 7);
    }
}
