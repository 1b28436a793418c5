// src/scrape/sites/mod.rs
pub mod goodreads;
pub mod toscrape;

use std::sync::Arc;

use crate::scrape::config::ScrapeConfig;
use crate::scrape::types::QuoteSite;

/// The fixed adapter set, in merge-priority order. Disabled sites are left
/// out; the set is built once at startup and shared across requests.
pub fn build_sites(cfg: &ScrapeConfig) -> Vec<Arc<dyn QuoteSite>> {
    let timeout = cfg.per_source_timeout();
    let mut sites: Vec<Arc<dyn QuoteSite>> = Vec::new();
    if cfg.toscrape.enabled {
        sites.push(Arc::new(toscrape::ToScrapeSite::new(
            cfg.toscrape
                .base_url
                .clone()
                .unwrap_or_else(|| toscrape::DEFAULT_BASE_URL.to_string()),
            timeout,
        )));
    }
    if cfg.goodreads.enabled {
        sites.push(Arc::new(goodreads::GoodreadsSite::new(
            cfg.goodreads
                .base_url
                .clone()
                .unwrap_or_else(|| goodreads::DEFAULT_BASE_URL.to_string()),
            timeout,
        )));
    }
    sites
}
