//! # Prometheus Exposition
//!
//! Renders the samples of one scrape in the Prometheus text format.
//!
//! Each render installs a fresh [`PrometheusRecorder`] as the thread-local
//! recorder, replays the samples through the `metrics` macros and renders the
//! result. Nothing is kept between scrapes, so a secret that disappears from
//! Vault disappears from the next exposition.

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusRecorder};

use crate::exporter::{ExpirySample, Sample};

/// Days until expiry, labelled with path, owner and usage.
pub const EXPIRY_DAYS_REMAINING: &str = "vault_secret_expiry_days_remaining";
/// 1 when the secret has no usable `expiry_date`, 0 otherwise.
pub const HAS_NO_EXPIRY_DATE: &str = "vault_secret_has_no_expiry_date";
/// Process-lifetime count of scrape failures.
pub const SCRAPE_ERRORS_TOTAL: &str = "vault_exporter_scrape_errors_total";

const EXPIRY_DAYS_REMAINING_HELP: &str = "Number of days remaining until the secret expires. A negative value means the secret has expired.";
const HAS_NO_EXPIRY_DATE_HELP: &str =
    "Indicates if a secret does not have an expiry_date set (1 = no date, 0 = date exists).";
const SCRAPE_ERRORS_TOTAL_HELP: &str =
    "Total number of errors encountered while scraping metrics from Vault.";

/// Content type of the rendered exposition.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Render `samples` as a complete exposition document.
pub fn render_samples(samples: &[Sample]) -> String {
    let recorder: PrometheusRecorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        describe_metrics();
        for sample in samples {
            record_sample(sample);
        }
    });

    handle.render()
}

fn describe_metrics() {
    describe_gauge!(EXPIRY_DAYS_REMAINING, EXPIRY_DAYS_REMAINING_HELP);
    describe_gauge!(HAS_NO_EXPIRY_DATE, HAS_NO_EXPIRY_DATE_HELP);
    describe_counter!(SCRAPE_ERRORS_TOTAL, SCRAPE_ERRORS_TOTAL_HELP);
}

fn record_sample(sample: &Sample) {
    match sample {
        Sample::NoExpiry { path, has_no_expiry } => {
            let value = if *has_no_expiry { 1.0 } else { 0.0 };
            gauge!(HAS_NO_EXPIRY_DATE, "path" => path.to_string()).set(value);
        }
        Sample::Expiry(ExpirySample { path, days_remaining, owner_email, usage_description }) => {
            let labels = [
                ("path", path.to_string()),
                ("owner_email", owner_email.clone()),
                ("usage_description", usage_description.clone()),
            ];
            gauge!(EXPIRY_DAYS_REMAINING, &labels).set(*days_remaining);
        }
        Sample::ScrapeErrors { total } => {
            counter!(SCRAPE_ERRORS_TOTAL).absolute(*total);
        }
    }
}
