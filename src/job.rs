use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::config::{ConnectionConfig, JobConfig};
use crate::db::ListingRow;
use crate::page::PageAccessor;

/// One visited page as handed back by the host crawler: the resolved URL
/// plus whatever the job's extractor produced for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub url: String,
    pub data: ListingRow,
}

/// Read-only view of crawl progress supplied by the host queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueSnapshot {
    pub done: usize,
    pub pending: usize,
}

/// Crawl-stop signal. The first request flips the flag; the host polls
/// is_requested between pages, so repeated requests are harmless.
#[derive(Debug, Default)]
pub struct StopHandle {
    requested: AtomicBool,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Returns true only for the call that flipped the flag.
    pub fn request(&self) -> bool {
        !self.requested.swap(true, Ordering::SeqCst)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Contract between a scraping job and the host crawler. The host owns the
/// browser, the queue and all scheduling; the job supplies extraction, the
/// per-page hook, link filtering and its static descriptors.
#[async_trait]
pub trait CrawlJob: Send + Sync {
    /// Entry URL the host seeds the queue with.
    fn start_url(&self) -> &str;

    /// Crawl parameters the host applies to this job.
    fn config(&self) -> &JobConfig;

    /// Backing services the host should connect to.
    fn connections(&self) -> &ConnectionConfig;

    /// Pull raw fields off a rendered page and normalize them.
    fn extract(&self, page: &dyn PageAccessor) -> ListingRow;

    /// Called after every completed page. Must return the result unchanged
    /// so the host can continue its own bookkeeping; nothing it does may
    /// abort the crawl other than asking `stop`.
    async fn after(
        &self,
        result: PageResult,
        snapshot: &QueueSnapshot,
        stop: &StopHandle,
    ) -> PageResult;

    /// Restrict discovered links to the ones worth queueing.
    fn filter(&self, links: Vec<String>) -> Vec<String>;

    /// Kick off a companion job run. Fire and forget.
    async fn start(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_request_flips_once() {
        let stop = StopHandle::new();
        assert!(!stop.is_requested());
        assert!(stop.request());
        assert!(stop.is_requested());
        // Second request is a no-op
        assert!(!stop.request());
        assert!(stop.is_requested());
    }
}
