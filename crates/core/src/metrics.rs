//! Prometheus metrics for the acquisition pipeline.
//!
//! This module provides metrics for:
//! - Acquisitions (per platform, result and duration)
//! - Post-processing (tagging failures, artwork fetches, produced files)
//! - Batches (runs by outcome)

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

// =============================================================================
// Acquisition Metrics
// =============================================================================

/// Acquisitions total by platform and result.
pub static ACQUISITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trackgrab_acquisitions_total", "Total acquisitions"),
        &["platform", "result"], // "success", "degraded", "failed"
    )
    .unwrap()
});

/// Acquisition duration in seconds.
pub static ACQUISITION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "trackgrab_acquisition_duration_seconds",
            "Duration of a single acquisition including post-processing",
        )
        .buckets(vec![1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        &["platform"],
    )
    .unwrap()
});

/// Failed acquisitions by platform and reason.
pub static ACQUISITION_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "trackgrab_acquisition_failures_total",
            "Failed acquisitions by reason",
        ),
        &["platform", "reason"], // AcquisitionError kind, "unsupported_platform", "panic"
    )
    .unwrap()
});

/// Files produced by adapters.
pub static FILES_PRODUCED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trackgrab_files_produced_total", "Total audio files produced"),
        &["platform", "format"],
    )
    .unwrap()
});

// =============================================================================
// Post-processing Metrics
// =============================================================================

/// Tag embedding failures (file kept untagged).
pub static TAG_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "trackgrab_tag_failures_total",
            "Total tag embedding failures",
        ),
        &["format"],
    )
    .unwrap()
});

/// Artwork fetches by result.
pub static ARTWORK_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trackgrab_artwork_fetches_total", "Total artwork fetches"),
        &["result"], // "ok", "failed"
    )
    .unwrap()
});

// =============================================================================
// Batch Metrics
// =============================================================================

/// Batch runs by outcome.
pub static BATCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trackgrab_batches_total", "Total batch runs"),
        &["outcome"], // "drained", "cancelled"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(ACQUISITIONS_TOTAL.clone()),
        Box::new(ACQUISITION_DURATION.clone()),
        Box::new(ACQUISITION_FAILURES.clone()),
        Box::new(FILES_PRODUCED.clone()),
        Box::new(TAG_FAILURES.clone()),
        Box::new(ARTWORK_FETCHES.clone()),
        Box::new(BATCHES_TOTAL.clone()),
    ]
}

/// Register all metrics in `registry`.
pub fn register_metrics(registry: &Registry) -> prometheus::Result<()> {
    for metric in all_metrics() {
        registry.register(metric)?;
    }
    Ok(())
}

/// Encode everything in `registry` as Prometheus text format.
pub fn encode_metrics(registry: &Registry) -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_encode() {
        let registry = Registry::new();
        register_metrics(&registry).unwrap();

        ACQUISITIONS_TOTAL
            .with_label_values(&["soundcloud", "success"])
            .inc();
        let text = encode_metrics(&registry).unwrap();
        assert!(text.contains("trackgrab_acquisitions_total"));
        assert!(text.contains("platform=\"soundcloud\""));
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = Registry::new();
        register_metrics(&registry).unwrap();
        assert!(register_metrics(&registry).is_err());
    }
}
