//! Terminal sinks and the end-of-batch report.

use trackgrab_core::{AcquisitionRequest, BatchSummary, ErrorSink, LogSink, StatusSink};

/// Status and log lines to stdout, errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSinks;

impl StatusSink for ConsoleSinks {
    fn status(&self, message: &str) {
        println!("{}", message);
    }
}

impl LogSink for ConsoleSinks {
    fn log(&self, message: &str) {
        println!("  {}", message);
    }
}

impl ErrorSink for ConsoleSinks {
    fn error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}

/// Human-readable summary of a finished batch.
pub fn summary_lines(summary: &BatchSummary) -> Vec<String> {
    let mut lines = Vec::with_capacity(summary.results.len() + 2);
    lines.push(String::new());
    for result in &summary.results {
        let line = match (&result.error, result.degraded) {
            (Some(error), _) => format!("FAILED   {} ({})", result.url, error),
            (None, true) => format!("UNTAGGED {} ({} file(s))", result.url, result.files.len()),
            (None, false) => format!("OK       {} ({} file(s))", result.url, result.files.len()),
        };
        lines.push(line);
    }

    let mut totals = format!(
        "{} succeeded, {} failed, {} of {} processed in {:.1}s",
        summary.succeeded,
        summary.failed,
        summary.completed,
        summary.total,
        summary.duration_ms() as f64 / 1000.0
    );
    if summary.cancelled {
        totals.push_str(" (cancelled)");
    }
    lines.push(totals);
    lines
}

/// Requests left in the queue after a cancelled batch, in queue order.
pub fn pending_lines(pending: &[AcquisitionRequest]) -> Vec<String> {
    if pending.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::with_capacity(pending.len() + 1);
    lines.push(format!("{} request(s) not started:", pending.len()));
    for request in pending {
        lines.push(format!(
            "PENDING  {} ({}, {})",
            request.url, request.platform, request.format
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;
    use trackgrab_core::{AcquisitionResult, AudioFormat, Platform};

    fn result(url: &str, error: Option<&str>, degraded: bool) -> AcquisitionResult {
        AcquisitionResult {
            request_id: "id".to_string(),
            url: url.to_string(),
            platform: Platform::SoundCloud,
            files: vec![PathBuf::from("a.mp3")],
            success: error.is_none(),
            degraded,
            error: error.map(String::from),
            elapsed_ms: 5,
        }
    }

    #[test]
    fn test_summary_lines() {
        let now = Utc::now();
        let summary = BatchSummary {
            total: 4,
            completed: 3,
            succeeded: 2,
            failed: 1,
            results: vec![
                result("u1", None, false),
                result("u2", Some("Command failed: x"), false),
                result("u3", None, true),
            ],
            started_at: now,
            finished_at: now,
            cancelled: true,
        };

        let lines = summary_lines(&summary);
        assert_eq!(lines[1], "OK       u1 (1 file(s))");
        assert_eq!(lines[2], "FAILED   u2 (Command failed: x)");
        assert_eq!(lines[3], "UNTAGGED u3 (1 file(s))");
        assert_eq!(
            lines[4],
            "2 succeeded, 1 failed, 3 of 4 processed in 0.0s (cancelled)"
        );
    }

    #[test]
    fn test_pending_lines() {
        assert!(pending_lines(&[]).is_empty());

        let pending = vec![
            AcquisitionRequest::new("u1", Platform::Spotify, AudioFormat::Mp3, "/out").unwrap(),
            AcquisitionRequest::new("u2", Platform::SoundCloud, AudioFormat::Wav, "/out").unwrap(),
        ];
        let lines = pending_lines(&pending);
        assert_eq!(lines[0], "2 request(s) not started:");
        assert_eq!(lines[1], format!("PENDING  u1 ({}, {})", Platform::Spotify, AudioFormat::Mp3));
        assert_eq!(lines[2], format!("PENDING  u2 ({}, {})", Platform::SoundCloud, AudioFormat::Wav));
    }
}
