//! Counter registry for the ingest endpoint.
//!
//! `CounterVec` keeps one atomic per distinct label combination. Labels are
//! flattened into sorted key vectors so `[("a","1"),("b","2")]` and
//! `[("b","2"),("a","1")]` address the same series.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Increment-by-label-set capability consumed by the ingest handler.
pub trait CounterSink: Send + Sync {
    fn inc(&self, labels: &[(&str, &str)]);
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum across every series.
    pub fn total(&self) -> u64 {
        self.map.iter().map(|r| r.value().load(Ordering::Relaxed)).sum()
    }

    /// Number of distinct label combinations seen.
    pub fn series(&self) -> usize {
        self.map.len()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let key = r.key();
            let val = r.value().load(Ordering::Relaxed);
            if key.is_empty() {
                let _ = writeln!(out, "{} {}", name, val);
                continue;
            }
            let label_str = key
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

impl CounterSink for CounterVec {
    fn inc(&self, labels: &[(&str, &str)]) {
        CounterVec::inc(self, labels);
    }
}

/// Process-wide metrics, built once at startup and injected where needed.
#[derive(Default)]
pub struct IngestMetrics {
    /// Accepted posts, keyed by origin/proxies/path depending on config.
    pub posts_received: CounterVec,
    /// Posts answered with 400, keyed by `reason`.
    pub posts_rejected: CounterVec,
    draining: AtomicBool,
}

impl IngestMetrics {
    /// Mark draining state.
    pub fn set_draining(&self) { self.draining.store(true, Ordering::Relaxed); }
    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool { self.draining.load(Ordering::Relaxed) }

    /// Render all registered metrics plus any extra gauge lines provided by callers.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        self.posts_received.render(
            "metrics_posts_received_total",
            "The total number of received posts for metrics",
            &mut out,
        );
        self.posts_rejected.render(
            "phantom_rejected_posts_total",
            "Posts rejected before counting",
            &mut out,
        );

        let _ = writeln!(out, "# TYPE phantom_draining gauge\nphantom_draining {}", if self.is_draining() { 1 } else { 0 });
        for (k, v) in extra {
            let _ = writeln!(out, "# TYPE {} gauge\n{} {}", k, k, v);
        }
        out
    }
}

/// The handler's sink is the posts counter.
impl CounterSink for IngestMetrics {
    fn inc(&self, labels: &[(&str, &str)]) {
        self.posts_received.inc(labels);
    }
}
