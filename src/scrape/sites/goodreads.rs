// src/scrape/sites/goodreads.rs
use std::time::Duration;

use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::fetch::Fetch;
use crate::scrape::types::{Quote, QuoteSite, SourceError, SourceId};
use crate::scrape::{normalize_text, strip_wrapping_quotes};

pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com/quotes";

/// Attribution dash Goodreads prints between quote text and author.
const ATTRIBUTION_DASH: char = '\u{2015}';

/// Adapter for goodreads.com/quotes. Quotes live in repeated `div.quoteText`
/// blocks: the text is the run before the attribution dash, the author sits
/// in `span.authorOrTitle`.
pub struct GoodreadsSite {
    base_url: String,
    timeout: Duration,
}

impl GoodreadsSite {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }

    fn parse(&self, html: &str) -> Vec<Quote> {
        let t0 = std::time::Instant::now();

        static RE_BLOCK: OnceCell<Regex> = OnceCell::new();
        let re_block = RE_BLOCK.get_or_init(|| {
            Regex::new(r#"(?is)<div[^>]*class="[^"]*\bquoteText\b[^"]*"[^>]*>(.*?)</div>"#)
                .unwrap()
        });
        static RE_AUTHOR: OnceCell<Regex> = OnceCell::new();
        let re_author = RE_AUTHOR.get_or_init(|| {
            Regex::new(r#"(?is)<span[^>]*class="[^"]*\bauthorOrTitle\b[^"]*"[^>]*>(.*?)</span>"#)
                .unwrap()
        });

        let mut out = Vec::new();
        for block in re_block.captures_iter(html) {
            let chunk = &block[1];
            // Everything past the dash is attribution, already captured
            // separately from the author span.
            let full = normalize_text(chunk);
            let text =
                strip_wrapping_quotes(full.split(ATTRIBUTION_DASH).next().unwrap_or("")).to_string();
            if text.is_empty() {
                continue;
            }
            let author = re_author
                .captures(chunk)
                .map(|m| normalize_text(&m[1]))
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            out.push(Quote {
                text,
                author,
                source: SourceId::Goodreads,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("scrape_parse_ms").record(ms);
        counter!("scrape_quotes_total").increment(out.len() as u64);
        out
    }
}

#[async_trait]
impl QuoteSite for GoodreadsSite {
    fn id(&self) -> SourceId {
        SourceId::Goodreads
    }

    fn url(&self, category: Option<&str>) -> String {
        match category {
            Some(cat) => format!("{}/tag/{}", self.base_url, urlencoding::encode(cat)),
            None => self.base_url.clone(),
        }
    }

    async fn fetch_and_parse(
        &self,
        fetcher: &dyn Fetch,
        category: Option<&str>,
    ) -> Result<Vec<Quote>, SourceError> {
        let url = self.url(category);
        let body = fetcher
            .fetch(&url, self.timeout)
            .await
            .map_err(|e| SourceError::fetch(SourceId::Goodreads, e))?;
        let html = std::str::from_utf8(&body)
            .map_err(|e| SourceError::parse(SourceId::Goodreads, e.to_string()))?;

        let quotes = self.parse(html);
        if quotes.is_empty() {
            tracing::warn!(url = %url, "no quote blocks matched");
        }
        Ok(quotes)
    }
}
