//! Download progress parsing from yt-dlp output.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::debug;

use crate::sink::LogSink;

static PROGRESS_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\[download\]\s+(\d{1,3}(?:\.\d+)?)%").ok());

/// Percentage from a `[download]  42.0% of ...` line.
pub fn parse_progress(line: &str) -> Option<f32> {
    let re = PROGRESS_RE.as_ref()?;
    let caps = re.captures(line.trim_start())?;
    let percent = caps.get(1)?.as_str().parse::<f32>().ok()?;
    (0.0..=100.0).contains(&percent).then_some(percent)
}

/// [`LogSink`] wrapper that forwards every line and traces progress in 10%
/// steps.
pub struct ProgressLog<'a> {
    inner: &'a dyn LogSink,
    label: &'a str,
    last_step: AtomicU8,
}

impl<'a> ProgressLog<'a> {
    pub fn new(inner: &'a dyn LogSink, label: &'a str) -> Self {
        Self {
            inner,
            label,
            last_step: AtomicU8::new(0),
        }
    }
}

impl LogSink for ProgressLog<'_> {
    fn log(&self, message: &str) {
        self.inner.log(message);

        if let Some(percent) = parse_progress(message) {
            let step = (percent / 10.0).floor() as u8;
            // A new item in a multi-file download starts again from 0%.
            let previous = self.last_step.swap(step, Ordering::Relaxed);
            if step != previous {
                debug!("{}: {}%", self.label, step * 10);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_parse_progress() {
        assert_eq!(
            parse_progress("[download]  45.3% of    3.52MiB at  1.02MiB/s ETA 00:02"),
            Some(45.3)
        );
        assert_eq!(parse_progress("[download] 100% of 3.52MiB in 00:03"), Some(100.0));
        assert_eq!(parse_progress("[download] Destination: /m/Song.webm"), None);
        assert_eq!(parse_progress("[ExtractAudio] Destination: /m/Song.mp3"), None);
        assert_eq!(parse_progress("[download] 450% nonsense"), None);
    }

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl LogSink for Lines {
        fn log(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_progress_log_forwards_everything() {
        let lines = Lines::default();
        let log = ProgressLog::new(&lines, "yt-dlp");
        log.log("[soundcloud] Extracting URL");
        log.log("[download]  12.5% of 1MiB");
        log.log("[download]  57.0% of 1MiB");

        assert_eq!(lines.0.lock().unwrap().len(), 3);
        assert_eq!(log.last_step.load(Ordering::Relaxed), 5);
    }
}
