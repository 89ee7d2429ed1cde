use crate::extractor::ExtractionResult;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the run totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    /// Tasks handed to the pool, counted at submission.
    pub documents_submitted: u64,
    /// Sum of page counts over successful extractions.
    pub pages_total: u64,
    pub documents_counted: u64,
    pub documents_failed: u64,
}

impl RunCounters {
    pub fn completed(&self) -> u64 {
        self.documents_counted + self.documents_failed
    }
}

/// Shared run totals, updated lock-free by the dispatcher and every worker.
///
/// Relaxed ordering is enough: [`Aggregator::snapshot`] is only trusted
/// after the pool has been joined, and the join itself synchronizes.
#[derive(Debug, Default)]
pub struct Aggregator {
    documents_submitted: AtomicU64,
    pages_total: AtomicU64,
    documents_counted: AtomicU64,
    documents_failed: AtomicU64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submitted(&self) {
        self.documents_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, pages: u64) {
        self.pages_total.fetch_add(pages, Ordering::Relaxed);
        self.documents_counted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.documents_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record(&self, result: &ExtractionResult) {
        match result.pages() {
            Some(pages) => self.record_success(pages),
            None => self.record_failure(),
        }
    }

    /// May be called at any time; values are only final after a full drain.
    pub fn snapshot(&self) -> RunCounters {
        RunCounters {
            documents_submitted: self.documents_submitted.load(Ordering::Relaxed),
            pages_total: self.pages_total.load(Ordering::Relaxed),
            documents_counted: self.documents_counted.load(Ordering::Relaxed),
            documents_failed: self.documents_failed.load(Ordering::Relaxed),
        }
    }
}
