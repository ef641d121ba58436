//! Operation counters and a monotonic timer for algorithm runs.
//!
//! Every analysis object owns one [`Metrics`] value and bumps named counters
//! while it traverses the graph. The counters never feed back into an
//! algorithm; they exist for reports and for tests that check work scales
//! with `V + E`.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::json;

/// Frozen copy of a [`Metrics`] value, for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub summary: String,
    pub elapsed_us: u64,
    pub total_operations: u64,
    pub counters: BTreeMap<&'static str, u64>,
}

/// Named counters plus a start/stop timer.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    /// Set while the timer runs.
    started: Option<Instant>,
    elapsed: Duration,
}

impl Metrics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
        self.elapsed = Duration::ZERO;
    }

    /// Stop the timer. No-op when it is not running.
    pub fn stop_timer(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    /// Time between the last start and stop, or until now while running.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.as_ref().map_or(self.elapsed, Instant::elapsed)
    }

    /// Add one to `name`.
    pub fn increment(&mut self, name: &'static str) {
        self.add(name, 1);
    }

    /// Add `value` to `name`.
    pub fn add(&mut self, name: &'static str, value: u64) {
        let slot = self.counters.entry(name).or_insert(0);
        *slot = slot.saturating_add(value);
    }

    /// Current value of `name`; zero when never touched.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Snapshot of all counters, sorted by name.
    #[must_use]
    pub fn counters(&self) -> BTreeMap<&'static str, u64> {
        self.counters.clone()
    }

    /// Sum over all counters.
    #[must_use]
    pub fn total_operations(&self) -> u64 {
        self.counters.values().fold(0, |acc, v| acc.saturating_add(*v))
    }

    /// Clear counters and timer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// One-line summary, e.g. `Time: 0.042ms | Ops: 17`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Time: {} | Ops: {}",
            format_duration(self.elapsed()),
            self.total_operations()
        )
    }

    /// Copy the current counters and timing.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            summary: self.summary(),
            elapsed_us: u64::try_from(self.elapsed().as_micros()).unwrap_or(u64::MAX),
            total_operations: self.total_operations(),
            counters: self.counters.clone(),
        }
    }

    /// Render counters and elapsed time as JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "elapsed_us": self.elapsed().as_micros(),
            "total_operations": self.total_operations(),
            "counters": self.counters,
        })
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Execution time: {}", format_duration(self.elapsed()))?;
        for (name, value) in &self.counters {
            writeln!(f, "  {name:<24} {value:>8}")?;
        }
        write!(f, "Total operations: {}", self.total_operations())
    }
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        let secs = micros / 1_000_000;
        let millis = (micros % 1_000_000) / 1_000;
        format!("{secs}.{millis:03}s")
    } else {
        let millis = micros / 1_000;
        let rem = micros % 1_000;
        format!("{millis}.{rem:03}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_default_to_zero() {
        let m = Metrics::new();
        assert_eq!(m.counter("dfs_visits"), 0);
        assert_eq!(m.total_operations(), 0);
    }

    #[test]
    fn increment_and_add_accumulate() {
        let mut m = Metrics::new();
        m.increment("relaxations");
        m.increment("relaxations");
        m.add("relaxations", 3);
        m.add("queue_adds", 2);
        assert_eq!(m.counter("relaxations"), 5);
        assert_eq!(m.total_operations(), 7);
        assert_eq!(
            m.counters().keys().copied().collect::<Vec<_>>(),
            vec!["queue_adds", "relaxations"]
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut m = Metrics::new();
        m.start_timer();
        m.increment("x");
        m.stop_timer();
        m.reset();
        assert_eq!(m.counter("x"), 0);
        assert_eq!(m.elapsed(), Duration::ZERO);
    }

    #[test]
    fn stop_without_start_is_noop() {
        let mut m = Metrics::new();
        m.stop_timer();
        assert_eq!(m.elapsed(), Duration::ZERO);
    }

    #[test]
    fn stopped_timer_is_frozen() {
        let mut m = Metrics::new();
        m.start_timer();
        m.stop_timer();
        let first = m.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(m.elapsed(), first);
    }

    #[test]
    fn running_timer_reads_live_and_second_stop_keeps_value() {
        let mut m = Metrics::new();
        m.start_timer();
        std::thread::sleep(Duration::from_millis(2));
        assert!(m.elapsed() >= Duration::from_millis(2));

        m.stop_timer();
        let frozen = m.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        m.stop_timer();
        assert_eq!(m.elapsed(), frozen);
    }

    #[test]
    fn format_duration_picks_unit() {
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.500ms");
        assert_eq!(format_duration(Duration::from_millis(2_250)), "2.250s");
    }

    #[test]
    fn json_carries_counters() {
        let mut m = Metrics::new();
        m.add("dfs_visits", 4);
        let value = m.to_json();
        assert_eq!(value["counters"]["dfs_visits"], 4);
        assert_eq!(value["total_operations"], 4);
    }

    #[test]
    fn snapshot_matches_live_values() {
        let mut m = Metrics::new();
        m.add("queue_adds", 3);
        let snap = m.snapshot();
        assert_eq!(snap.total_operations, 3);
        assert_eq!(snap.counters.get("queue_adds"), Some(&3));
        assert!(snap.summary.ends_with("Ops: 3"));
    }
}
