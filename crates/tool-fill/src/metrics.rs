use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use crate::ports::MetricsPort;

/// Process-local fill counters.
#[derive(Debug, Default)]
pub struct FillMetrics {
    runs: AtomicU64,
    attempted: AtomicU64,
    filled: AtomicU64,
    failed: AtomicU64,
    last_latency_ms: AtomicU64,
    filled_by_kind: Mutex<BTreeMap<String, u64>>,
    failed_by_kind: Mutex<BTreeMap<String, u64>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillMetricsSnapshot {
    pub runs: u64,
    pub attempted: u64,
    pub filled: u64,
    pub failed: u64,
    pub last_latency_ms: u64,
    pub filled_by_kind: BTreeMap<String, u64>,
    pub failed_by_kind: BTreeMap<String, u64>,
}

impl FillMetrics {
    pub fn snapshot(&self) -> FillMetricsSnapshot {
        FillMetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            attempted: self.attempted.load(Ordering::Relaxed),
            filled: self.filled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            last_latency_ms: self.last_latency_ms.load(Ordering::Relaxed),
            filled_by_kind: self.filled_by_kind.lock().clone(),
            failed_by_kind: self.failed_by_kind.lock().clone(),
        }
    }
}

impl MetricsPort for FillMetrics {
    fn record_ok(&self, kind: &str) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        self.filled.fetch_add(1, Ordering::Relaxed);
        *self
            .filled_by_kind
            .lock()
            .entry(kind.to_string())
            .or_default() += 1;
    }

    fn record_fail(&self, kind: &str) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
        *self
            .failed_by_kind
            .lock()
            .entry(kind.to_string())
            .or_default() += 1;
    }

    fn record_run(&self, latency_ms: u128) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.last_latency_ms
            .store(u64::try_from(latency_ms).unwrap_or(u64::MAX), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = FillMetrics::default();
        metrics.record_ok("value");
        metrics.record_ok("value");
        metrics.record_fail("option-not-found");
        metrics.record_run(12);
        let snap = metrics.snapshot();
        assert_eq!(snap.runs, 1);
        assert_eq!(snap.attempted, 3);
        assert_eq!(snap.filled, 2);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.last_latency_ms, 12);
        assert_eq!(snap.filled_by_kind.get("value"), Some(&2));
        assert_eq!(snap.failed_by_kind.get("option-not-found"), Some(&1));
    }
}
