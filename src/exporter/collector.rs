//! Maps secret metadata to expiry samples.
//!
//! One scrape walks the mount, fetches metadata for every leaf and classifies
//! it:
//!
//! | metadata                                         | samples emitted                     |
//! |--------------------------------------------------|-------------------------------------|
//! | fetch failed                                     | none (error counted)                |
//! | no metadata, no custom fields, no usable date    | `has_no_expiry = 1`                 |
//! | `expiry_date` present but not RFC 3339           | `has_no_expiry = 0` (error counted) |
//! | `expiry_date` valid                              | `has_no_expiry = 0` + days remaining |
//!
//! The malformed-date row leaves a path flagged as having a date while no
//! days-remaining series exists for it. That asymmetry is intentional and
//! kept as observed behavior.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn, Instrument};

use super::error::{CollectionError, DateFormatError};
use super::walker::{PathWalker, SecretPath};
use crate::secrets::{MetadataValue, SecretMetadata, SecretStore};

/// Custom metadata key holding the RFC 3339 expiry timestamp.
pub const EXPIRY_DATE_FIELD: &str = "expiry_date";
/// Custom metadata key copied into the `owner_email` label.
pub const OWNER_EMAIL_FIELD: &str = "owner_email";
/// Custom metadata key copied into the `usage_description` label.
pub const USAGE_DESCRIPTION_FIELD: &str = "usage_description";

const NANOS_PER_DAY: f64 = 86_400_000_000_000.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Cumulative count of failed listing, metadata and date-parse operations.
///
/// Shared by every scrape for the lifetime of the process; never reset.
#[derive(Debug, Default)]
pub struct ScrapeErrorCounter(AtomicU64);

impl ScrapeErrorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Days-to-expiry observation for one secret.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpirySample {
    pub path: SecretPath,
    /// Negative once the secret has expired.
    pub days_remaining: f64,
    pub owner_email: String,
    pub usage_description: String,
}

/// A single observation produced by a scrape.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    NoExpiry { path: SecretPath, has_no_expiry: bool },
    Expiry(ExpirySample),
    ScrapeErrors { total: u64 },
}

/// Append-only destination for samples.
pub trait SampleSink {
    fn emit(&mut self, sample: Sample);
}

impl SampleSink for Vec<Sample> {
    fn emit(&mut self, sample: Sample) {
        self.push(sample);
    }
}

/// Result of looking up `expiry_date` in a secret's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryLookup<'a> {
    /// No usable value; the reason is only used for logging.
    Missing(&'static str),
    Present(&'a str),
}

/// Extract the raw `expiry_date` string, if there is a usable one.
///
/// Absent metadata, absent custom fields, an absent key, a non-string value
/// and an empty string all count as missing.
pub fn lookup_expiry_date(metadata: Option<&SecretMetadata>) -> ExpiryLookup<'_> {
    let Some(fields) = metadata.and_then(|m| m.custom_metadata.as_ref()) else {
        return ExpiryLookup::Missing("no custom metadata");
    };

    match fields.get(EXPIRY_DATE_FIELD) {
        None => ExpiryLookup::Missing("no 'expiry_date' field"),
        Some(MetadataValue::Text(text)) if text.is_empty() => {
            ExpiryLookup::Missing("empty 'expiry_date' field")
        }
        Some(MetadataValue::Text(text)) => ExpiryLookup::Present(text),
        Some(
            MetadataValue::Bool(_)
            | MetadataValue::Number(_)
            | MetadataValue::Null
            | MetadataValue::Structured(_),
        ) => ExpiryLookup::Missing("'expiry_date' is not a string"),
    }
}

/// Parse an RFC 3339 timestamp with offset.
///
/// Only the strict layout is accepted: an uppercase `T` between date and time
/// and either an uppercase `Z` or a `+HH:MM`/`-HH:MM` offset.
pub fn parse_expiry_date(path: &str, raw: &str) -> Result<DateTime<Utc>, CollectionError> {
    let parsed = if has_rfc3339_layout(raw) {
        DateTime::parse_from_rfc3339(raw).map_err(DateFormatError::from)
    } else {
        Err(DateFormatError::Layout)
    };

    parsed.map(|expiry| expiry.with_timezone(&Utc)).map_err(|source| {
        CollectionError::DateParse { path: path.to_string(), value: raw.to_string(), source }
    })
}

fn has_rfc3339_layout(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let digits = |range: std::ops::Range<usize>| {
        bytes.get(range).is_some_and(|run| run.iter().all(u8::is_ascii_digit))
    };

    if bytes.len() < 20
        || !digits(0..4)
        || bytes[4] != b'-'
        || !digits(5..7)
        || bytes[7] != b'-'
        || !digits(8..10)
        || bytes[10] != b'T'
        || !digits(11..13)
        || bytes[13] != b':'
        || !digits(14..16)
        || bytes[16] != b':'
        || !digits(17..19)
    {
        return false;
    }

    let mut zone = &bytes[19..];
    if let Some(fraction) = zone.strip_prefix(b".") {
        let len = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return false;
        }
        zone = &fraction[len..];
    }

    match zone {
        [b'Z'] => true,
        [b'+' | b'-', h1, h2, b':', m1, m2] => [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// Signed, fractional days from `now` until `expiry`.
pub fn days_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta = expiry - now;
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NANOS_PER_DAY,
        // Beyond roughly 292 years the nanosecond count overflows i64.
        None => delta.num_milliseconds() as f64 / MILLIS_PER_DAY,
    }
}

/// String-typed custom field, or empty string for anything else.
fn text_field(metadata: Option<&SecretMetadata>, name: &str) -> String {
    metadata
        .and_then(|m| m.custom_field(name))
        .and_then(MetadataValue::as_text)
        .unwrap_or_default()
        .to_string()
}

/// Produces expiry samples on demand.
///
/// Collection never fails: every problem is logged, counted in the shared
/// [`ScrapeErrorCounter`] and the scrape carries on with what it has.
pub struct MetricCollector {
    walker: PathWalker,
    store: Arc<dyn SecretStore>,
    mount_path: String,
    errors: Arc<ScrapeErrorCounter>,
    metadata_concurrency: usize,
}

impl MetricCollector {
    /// Create a collector over `store`. `mount_path` is only used for log context.
    pub fn new(
        store: Arc<dyn SecretStore>,
        mount_path: impl Into<String>,
        errors: Arc<ScrapeErrorCounter>,
    ) -> Self {
        Self {
            walker: PathWalker::new(store.clone()),
            store,
            mount_path: mount_path.into(),
            errors,
            metadata_concurrency: 1,
        }
    }

    /// Allow up to `limit` metadata fetches in flight. Values below 1 are raised to 1.
    pub fn with_metadata_concurrency(mut self, limit: usize) -> Self {
        self.metadata_concurrency = limit.max(1);
        self
    }

    /// The process-wide error counter this collector reports.
    pub fn error_counter(&self) -> &Arc<ScrapeErrorCounter> {
        &self.errors
    }

    /// Run one scrape against the current time.
    pub async fn collect<S: SampleSink + Send>(&self, sink: &mut S) {
        self.collect_at(Utc::now(), sink).await
    }

    /// Run one scrape, computing expiry distances against `now`.
    pub async fn collect_at<S: SampleSink + Send>(&self, now: DateTime<Utc>, sink: &mut S) {
        let span = crate::scrape_span!(self.mount_path);
        self.scrape(now, sink).instrument(span).await
    }

    async fn scrape<S: SampleSink + Send>(&self, now: DateTime<Utc>, sink: &mut S) {
        match self.walker.list_all_secrets("").await {
            Err(err) => {
                error!(
                    error = %err,
                    path = %err.path(),
                    structural = err.is_structural(),
                    "Failed to list secrets"
                );
                self.errors.increment();
            }
            Ok(paths) => {
                let path_count = paths.len();
                let store = &self.store;
                let mut fetches = stream::iter(paths)
                    .map(move |path| async move {
                        let result = store.read_metadata(path.as_str()).await;
                        (path, result)
                    })
                    .buffered(self.metadata_concurrency);

                while let Some((path, result)) = fetches.next().await {
                    match result {
                        Ok(metadata) => self.classify(path, metadata.as_ref(), now, sink),
                        Err(source) => {
                            let err =
                                CollectionError::MetadataFetch { path: path.to_string(), source };
                            warn!(error = %err, path = %path, "Failed to get metadata for path");
                            self.errors.increment();
                        }
                    }
                }

                debug!(path_count, "Processed secret metadata");
            }
        }

        sink.emit(Sample::ScrapeErrors { total: self.errors.get() });
    }

    fn classify<S: SampleSink>(
        &self,
        path: SecretPath,
        metadata: Option<&SecretMetadata>,
        now: DateTime<Utc>,
        sink: &mut S,
    ) {
        let raw = match lookup_expiry_date(metadata) {
            ExpiryLookup::Missing(reason) => {
                warn!(path = %path, reason, "No usable expiry date for secret");
                sink.emit(Sample::NoExpiry { path, has_no_expiry: true });
                return;
            }
            ExpiryLookup::Present(raw) => raw,
        };

        sink.emit(Sample::NoExpiry { path: path.clone(), has_no_expiry: false });

        let expiry = match parse_expiry_date(path.as_str(), raw) {
            Ok(expiry) => expiry,
            Err(err) => {
                warn!(error = %err, path = %path, value = %raw, "Invalid date format for secret");
                self.errors.increment();
                return;
            }
        };

        sink.emit(Sample::Expiry(ExpirySample {
            days_remaining: days_remaining(expiry, now),
            owner_email: text_field(metadata, OWNER_EMAIL_FIELD),
            usage_description: text_field(metadata, USAGE_DESCRIPTION_FIELD),
            path,
        }));
    }
}
