// src/service.rs
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use metrics::gauge;

use crate::fetch::{Fetch, HttpFetcher};
use crate::scrape;
use crate::scrape::config::ScrapeConfig;
use crate::scrape::sites::build_sites;
use crate::scrape::types::{Quote, QuoteSite};

struct CacheEntry {
    stored_at: Instant,
    quotes: Vec<Quote>,
}

/// The one entry point the HTTP layer calls. Composes the fixed adapter set,
/// the shared fetcher, the overall deadline, and the response cache.
/// Upstream failure detail is logged below this boundary, never returned.
pub struct QuoteService {
    fetcher: Arc<dyn Fetch>,
    sites: Vec<Arc<dyn QuoteSite>>,
    overall_deadline: Duration,
    cache_ttl: Duration,
    cache: RwLock<HashMap<String, CacheEntry>>,
}

impl QuoteService {
    pub fn from_config(cfg: &ScrapeConfig) -> Self {
        Self::new(
            Arc::new(HttpFetcher::new()),
            build_sites(cfg),
            cfg.overall_deadline(),
            cfg.cache_ttl(),
        )
    }

    pub fn new(
        fetcher: Arc<dyn Fetch>,
        sites: Vec<Arc<dyn QuoteSite>>,
        overall_deadline: Duration,
        cache_ttl: Duration,
    ) -> Self {
        scrape::ensure_metrics_described();
        gauge!("quote_cache_ttl_secs").set(cache_ttl.as_secs_f64());
        Self {
            fetcher,
            sites,
            overall_deadline,
            cache_ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Aggregate quotes across all sites, served from the TTL cache when
    /// warm. Infallible by contract: upstream failure degrades to fewer (or
    /// zero) quotes, never to an error.
    pub async fn get_quotes(&self, category: Option<&str>) -> Vec<Quote> {
        let key = category.unwrap_or_default().trim().to_string();

        if !self.cache_ttl.is_zero() {
            let cache = self.cache.read().expect("cache lock poisoned");
            if let Some(entry) = cache.get(&key) {
                if entry.stored_at.elapsed() < self.cache_ttl {
                    return entry.quotes.clone();
                }
            }
        }

        let quotes = scrape::aggregate(
            &self.sites,
            Arc::clone(&self.fetcher),
            self.overall_deadline,
            (!key.is_empty()).then_some(key.as_str()),
        )
        .await;

        if !self.cache_ttl.is_zero() {
            let mut cache = self.cache.write().expect("cache lock poisoned");
            cache.insert(
                key,
                CacheEntry {
                    stored_at: Instant::now(),
                    quotes: quotes.clone(),
                },
            );
        }

        quotes
    }
}
