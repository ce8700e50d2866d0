use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,
    validation_failures: AtomicUsize,
    upstream_failures: AtomicUsize,
    cache_hits: AtomicUsize,

    // Timing (in microseconds)
    total_extract_time_us: AtomicU64,

    // Counts
    extractions: AtomicUsize,
    total_entities_extracted: AtomicUsize,
    total_relationships_extracted: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            validation_failures: AtomicUsize::new(0),
            upstream_failures: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
            total_extract_time_us: AtomicU64::new(0),
            extractions: AtomicUsize::new(0),
            total_entities_extracted: AtomicUsize::new(0),
            total_relationships_extracted: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_extract(&self, duration: std::time::Duration, entities: usize, relationships: usize) {
        self.total_extract_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.extractions.fetch_add(1, Ordering::Relaxed);
        self.total_entities_extracted.fetch_add(entities, Ordering::Relaxed);
        self.total_relationships_extracted.fetch_add(relationships, Ordering::Relaxed);
    }

    pub fn record_failure(&self, error: &extract::Error) {
        match error {
            extract::Error::Validation(_) => {
                self.validation_failures.fetch_add(1, Ordering::Relaxed);
            }
            extract::Error::Upstream(_) => {
                self.upstream_failures.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            extractions: self.extractions.load(Ordering::Relaxed),
            avg_extract_time_ms: self.avg_time_ms(&self.total_extract_time_us, &self.extractions),
            total_entities_extracted: self.total_entities_extracted.load(Ordering::Relaxed),
            total_relationships_extracted: self.total_relationships_extracted.load(Ordering::Relaxed),
        }
    }

    fn avg_time_ms(&self, total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
        let total = total_us.load(Ordering::Relaxed) as f64;
        let cnt = count.load(Ordering::Relaxed) as f64;
        if cnt > 0.0 {
            total / cnt / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub validation_failures: usize,
    pub upstream_failures: usize,
    pub cache_hits: usize,
    pub extractions: usize,
    pub avg_extract_time_ms: f64,
    pub total_entities_extracted: usize,
    pub total_relationships_extracted: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}
