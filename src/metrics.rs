use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::types::AnalysisResult;

/// Process-wide counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub analyses_started: Arc<AtomicUsize>,
    pub analyses_completed: Arc<AtomicUsize>,
    pub analyses_failed: Arc<AtomicUsize>,
    pub files_processed: Arc<AtomicU64>,
    pub bytes_scanned: Arc<AtomicU64>,
    pub warnings_count: Arc<AtomicUsize>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            analyses_started: Arc::new(AtomicUsize::new(0)),
            analyses_completed: Arc::new(AtomicUsize::new(0)),
            analyses_failed: Arc::new(AtomicUsize::new(0)),
            files_processed: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
            warnings_count: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_analyses_started(&self) {
        self.analyses_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_analyses_failed(&self) {
        self.analyses_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a finished analysis together with its files and bytes.
    pub fn record_completed(&self, result: &AnalysisResult) {
        self.analyses_completed.fetch_add(1, Ordering::Relaxed);
        self.files_processed.fetch_add(result.file_count as u64, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(result.total_size, Ordering::Relaxed);
    }

    pub fn add_warnings(&self, count: usize) {
        self.warnings_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analyses_started: self.analyses_started.load(Ordering::Relaxed),
            analyses_completed: self.analyses_completed.load(Ordering::Relaxed),
            analyses_failed: self.analyses_failed.load(Ordering::Relaxed),
            files_processed: self.files_processed.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            warnings_count: self.warnings_count.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub analyses_started: usize,
    pub analyses_completed: usize,
    pub analyses_failed: usize,
    pub files_processed: u64,
    pub bytes_scanned: u64,
    pub warnings_count: usize,
    pub uptime_seconds: u64,
}
