pub mod extract;
pub mod transform;
pub mod urls;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::{ConnectionConfig, JobConfig};
use crate::db::{self, ListingRow};
use crate::job::{CrawlJob, PageResult, QueueSnapshot, StopHandle};
use crate::page::PageAccessor;
use crate::trigger;

/// Halt the crawl once this many queue items have completed.
const STOP_AFTER: usize = 100;

/// The Craigslist New York apartment-listings job.
pub struct ApartmentListings {
    pool: PgPool,
    http: reqwest::Client,
    config: JobConfig,
    connections: ConnectionConfig,
}

impl ApartmentListings {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            http: reqwest::Client::new(),
            config: JobConfig::default(),
            connections: ConnectionConfig::from_env(),
        }
    }
}

#[async_trait]
impl CrawlJob for ApartmentListings {
    fn start_url(&self) -> &str {
        urls::START_URL
    }

    fn config(&self) -> &JobConfig {
        &self.config
    }

    fn connections(&self) -> &ConnectionConfig {
        &self.connections
    }

    fn extract(&self, page: &dyn PageAccessor) -> ListingRow {
        transform::transform(&extract::scrape_listing(page))
    }

    async fn after(
        &self,
        result: PageResult,
        snapshot: &QueueSnapshot,
        stop: &StopHandle,
    ) -> PageResult {
        if urls::is_listing_url(&result.url) {
            if let Err(e) = db::insert_listing(&self.pool, &result.data).await {
                warn!("Failed to persist listing from {}: {}", result.url, e);
            }
        }

        if snapshot.done >= STOP_AFTER && stop.request() {
            info!("{} pages done, requesting crawl stop", snapshot.done);
        }

        result
    }

    fn filter(&self, links: Vec<String>) -> Vec<String> {
        urls::filter_links(links)
    }

    async fn start(&self) {
        trigger::invoke(&self.http, &self.config.name).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PostgresConfig;

    fn test_job() -> ApartmentListings {
        let pool = db::connect_lazy(&PostgresConfig::from_env()).unwrap();
        ApartmentListings::new(pool)
    }

    // Index pages never touch the database in after()
    fn index_result() -> PageResult {
        PageResult {
            url: "https://newyork.craigslist.org/search/apa?s=120".to_string(),
            data: transform::transform(&extract::RawListing::default()),
        }
    }

    #[tokio::test]
    async fn no_stop_below_threshold() {
        let job = test_job();
        let stop = StopHandle::new();
        let snapshot = QueueSnapshot { done: 99, pending: 5 };
        job.after(index_result(), &snapshot, &stop).await;
        assert!(!stop.is_requested());
    }

    #[tokio::test]
    async fn stop_requested_when_threshold_first_reached() {
        let job = test_job();
        let stop = StopHandle::new();
        let snapshot = QueueSnapshot { done: 100, pending: 5 };
        job.after(index_result(), &snapshot, &stop).await;
        assert!(stop.is_requested());
    }

    #[tokio::test]
    async fn after_returns_result_unchanged() {
        let job = test_job();
        let stop = StopHandle::new();
        let input = index_result();
        let output = job
            .after(input.clone(), &QueueSnapshot::default(), &stop)
            .await;
        assert_eq!(output, input);
    }
}
