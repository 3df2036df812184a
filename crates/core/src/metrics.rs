use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct Metrics {
    launches_started: AtomicU64,
    launches_succeeded: AtomicU64,
    launches_aborted: AtomicU64,
    launches_failed: AtomicU64,
    launches_rejected: AtomicU64,
    backend_calls: AtomicU64,
    backend_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_launches_started(&self) {
        self.launches_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_launches_succeeded(&self) {
        self.launches_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_launches_aborted(&self) {
        self.launches_aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_launches_failed(&self) {
        self.launches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_launches_rejected(&self) {
        self.launches_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_backend_calls(&self) {
        self.backend_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_backend_failures(&self) {
        self.backend_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            launches_started: self.launches_started.load(Ordering::Relaxed),
            launches_succeeded: self.launches_succeeded.load(Ordering::Relaxed),
            launches_aborted: self.launches_aborted.load(Ordering::Relaxed),
            launches_failed: self.launches_failed.load(Ordering::Relaxed),
            launches_rejected: self.launches_rejected.load(Ordering::Relaxed),
            backend_calls: self.backend_calls.load(Ordering::Relaxed),
            backend_failures: self.backend_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub launches_started: u64,
    pub launches_succeeded: u64,
    pub launches_aborted: u64,
    pub launches_failed: u64,
    pub launches_rejected: u64,
    pub backend_calls: u64,
    pub backend_failures: u64,
}

impl MetricsSnapshot {
    pub fn backend_success_rate(&self) -> f64 {
        if self.backend_calls == 0 {
            return 1.0;
        }
        1.0 - (self.backend_failures as f64 / self.backend_calls as f64)
    }
}
