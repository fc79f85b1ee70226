//! Feed ingestion: CSV parsing, date coercion, and alias cleanup.
//!
//! The feed is a plain CSV listing; columns are resolved by header name so
//! upstream column reordering does not break the load. Every loaded record
//! is classified (both passes) on the way in, so a built [`Dataset`] is
//! always fully categorized.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::category;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::record::{ApplicationRecord, ApplicationStatus};

/// Default location of the FSA novel food applications listing.
pub const DEFAULT_SOURCE_URL: &str = "https://data.food.gov.uk/cbd-products/id/listing.csv";

/// Request timeout for a feed fetch; a cycle that exceeds it is dropped and
/// retried on the next tick.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const COL_MANUFACTURER: &str = "manufacturerSupplier";
const COL_PRODUCT_NAME: &str = "productName";
const COL_PRODUCT_SIZE: &str = "productSizeVolumeQuantity";
const COL_STATUS: &str = "status";
const COL_LAST_UPDATED: &str = "lastUpdated";

/// Manufacturer names containing this marker are folded into one alias.
/// The check is case-sensitive; the feed capitalizes these entries.
const ALIAS_MARKER: &str = "BRITISH CANNABIS";
const ALIAS_REPLACEMENT: &str = "CBD Health Ltd";

/// Date formats the feed has been seen to use, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Fetch the feed over HTTP and build a fully categorized dataset.
pub async fn fetch_dataset(url: &str) -> Result<Dataset> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let records = read_records(body.as_bytes())?;
    Ok(Dataset::new(records))
}

/// Read a previously downloaded feed CSV from disk.
pub fn load_file(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| Error::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    let records = read_records(BufReader::new(file))?;
    Ok(Dataset::new(records))
}

/// Parse feed CSV from any reader into categorized records.
///
/// Rows missing a required field are skipped and counted; a date that does
/// not parse loads as `None` so the row still contributes to the counts.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ApplicationRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in csv_reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                debug!("skipping malformed row: {}", err);
                skipped += 1;
                continue;
            }
        };
        match columns.record_from(&row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("dropped {} rows missing required fields", skipped);
    }
    Ok(records)
}

/// Positions of the required columns in the feed header.
struct ColumnIndex {
    manufacturer: usize,
    product_name: usize,
    product_size: usize,
    status: usize,
    last_updated: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| Error::MissingColumn {
                    name: name.to_string(),
                })
        };
        Ok(Self {
            manufacturer: find(COL_MANUFACTURER)?,
            product_name: find(COL_PRODUCT_NAME)?,
            product_size: find(COL_PRODUCT_SIZE)?,
            status: find(COL_STATUS)?,
            last_updated: find(COL_LAST_UPDATED)?,
        })
    }

    fn record_from(&self, row: &csv::StringRecord) -> Option<ApplicationRecord> {
        let manufacturer = normalize_manufacturer(row.get(self.manufacturer)?);
        let product_name = row.get(self.product_name)?.to_string();
        let product_size = row.get(self.product_size)?.to_string();
        let status = ApplicationStatus::parse(row.get(self.status)?);
        let last_updated = parse_feed_date(row.get(self.last_updated)?);
        let category = category::refine(category::categorize(&product_name), &product_size);
        Some(ApplicationRecord {
            manufacturer,
            product_name,
            product_size,
            status,
            last_updated,
            category,
        })
    }
}

fn normalize_manufacturer(raw: &str) -> String {
    if raw.contains(ALIAS_MARKER) {
        ALIAS_REPLACEMENT.to_string()
    } else {
        raw.to_string()
    }
}

fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // Timestamps like 2024-03-01T00:00:00Z parse from their date prefix.
    let prefix = raw.split('T').next().unwrap_or(raw);
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, format) {
            return Some(date);
        }
    }
    None
}
