//! # Expiry Collection
//!
//! The scrape pipeline: [`PathWalker`] discovers every leaf secret under the
//! KV mount and [`MetricCollector`] turns their custom metadata into
//! [`Sample`]s.

pub mod collector;
pub mod error;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use collector::{
    days_remaining, lookup_expiry_date, parse_expiry_date, ExpiryLookup, ExpirySample,
    MetricCollector, Sample, SampleSink, ScrapeErrorCounter, EXPIRY_DATE_FIELD, OWNER_EMAIL_FIELD,
    USAGE_DESCRIPTION_FIELD,
};
pub use error::{CollectionError, DateFormatError};
pub use walker::{join_path, ListingEntry, ListingNode, PathWalker, SecretPath};
