//! Tool call latency tracking.
//!
//! Every recorded duration goes to the Prometheus `tool_use_duration_ms`
//! histogram and to a per-tool sliding window used to estimate how long a
//! tool usually takes. The window keeps the last five minutes, capped at
//! [`MAX_SAMPLES`] entries per tool.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Answer when a tool has no recent samples.
pub const DEFAULT_TIME_TO_USE_MS: f64 = 15_000.0;

const MAX_SAMPLES: usize = 512;
const WINDOW: Duration = Duration::from_secs(5 * 60);

#[derive(Clone, Default)]
pub struct ToolUsageTracker {
    samples: Arc<Mutex<HashMap<String, VecDeque<(Instant, f64)>>>>,
}

impl ToolUsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tool call.
    ///
    /// Only message generation runs tools, and this service does not generate
    /// messages, so nothing records in production and every tool reports
    /// [`DEFAULT_TIME_TO_USE_MS`].
    pub fn record(&self, tool_id: &str, duration: Duration) {
        let ms = duration.as_secs_f64() * 1000.0;
        metrics::histogram!("tool_use_duration_ms", "tool" => tool_id.to_string()).record(ms);
        self.push(tool_id, Instant::now(), ms);
    }

    fn push(&self, tool_id: &str, at: Instant, ms: f64) {
        let mut samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        let window = samples.entry(tool_id.to_string()).or_default();
        window.push_back((at, ms));
        while window.len() > MAX_SAMPLES {
            window.pop_front();
        }
    }

    /// Nearest-rank quantile of the recent durations, in milliseconds.
    pub fn quantile(&self, tool_id: &str, q: f64) -> Option<f64> {
        let mut samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        let window = samples.get_mut(tool_id)?;

        let cutoff = Instant::now().checked_sub(WINDOW);
        if let Some(cutoff) = cutoff {
            while window.front().is_some_and(|(at, _)| *at < cutoff) {
                window.pop_front();
            }
        }
        if window.is_empty() {
            return None;
        }

        let mut values: Vec<f64> = window.iter().map(|(_, ms)| *ms).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let rank = (q.clamp(0.0, 1.0) * values.len() as f64).ceil() as usize;
        Some(values[rank.saturating_sub(1).min(values.len() - 1)])
    }

    /// Expected duration shown to clients: the 0.9 quantile, or 15 seconds.
    pub fn time_to_use_ms(&self, tool_id: &str) -> f64 {
        self.quantile(tool_id, 0.9).unwrap_or(DEFAULT_TIME_TO_USE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_uses_default() {
        let tracker = ToolUsageTracker::new();
        assert_eq!(tracker.time_to_use_ms("nope"), 15_000.0);
    }

    #[test]
    fn test_p90_of_recorded_durations() {
        let tracker = ToolUsageTracker::new();
        for ms in 1..=10 {
            tracker.record("search", Duration::from_millis(ms * 100));
        }
        assert_eq!(tracker.time_to_use_ms("search"), 900.0);
        assert_eq!(tracker.quantile("search", 0.5), Some(500.0));
        assert_eq!(tracker.quantile("search", 1.0), Some(1000.0));
    }

    #[test]
    fn test_window_is_capped() {
        let tracker = ToolUsageTracker::new();
        for _ in 0..MAX_SAMPLES {
            tracker.record("t", Duration::from_millis(10));
        }
        for _ in 0..MAX_SAMPLES {
            tracker.record("t", Duration::from_millis(20));
        }
        assert_eq!(tracker.quantile("t", 0.0), Some(20.0));
    }

    #[test]
    fn test_stale_samples_are_dropped() {
        let tracker = ToolUsageTracker::new();
        if let Some(old) = Instant::now().checked_sub(WINDOW + Duration::from_secs(1)) {
            tracker.push("t", old, 99_000.0);
            assert_eq!(tracker.quantile("t", 0.9), None);
        }
    }

    #[test]
    fn test_record_feeds_histogram() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let tracker = ToolUsageTracker::new();

        metrics::with_local_recorder(&recorder, || {
            tracker.record("search", Duration::from_millis(250));
            tracker.record("search", Duration::from_millis(750));
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"tool_use_duration_ms_count{tool="search"} 2"#));
        assert!(rendered.contains(r#"tool_use_duration_ms_sum{tool="search"} 1000"#));
    }
}
