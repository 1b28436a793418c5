// src/scrape/sites/toscrape.rs
use std::time::Duration;

use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::fetch::Fetch;
use crate::scrape::types::{Quote, QuoteSite, SourceError, SourceId};
use crate::scrape::{normalize_text, strip_wrapping_quotes};

pub const DEFAULT_BASE_URL: &str = "http://quotes.toscrape.com";

/// Adapter for quotes.toscrape.com. Quotes live in repeated `div.quote`
/// blocks: text in `span.text`, attribution in `small.author`.
pub struct ToScrapeSite {
    base_url: String,
    timeout: Duration,
}

impl ToScrapeSite {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }

    fn parse(&self, html: &str) -> Vec<Quote> {
        let t0 = std::time::Instant::now();

        static RE_BLOCK: OnceCell<Regex> = OnceCell::new();
        let re_block = RE_BLOCK.get_or_init(|| {
            Regex::new(r#"(?is)<div[^>]*class="[^"]*\bquote\b[^"]*"[^>]*>(.*?)</div>"#).unwrap()
        });
        static RE_TEXT: OnceCell<Regex> = OnceCell::new();
        let re_text = RE_TEXT.get_or_init(|| {
            Regex::new(r#"(?is)<span[^>]*class="[^"]*\btext\b[^"]*"[^>]*>(.*?)</span>"#).unwrap()
        });
        static RE_AUTHOR: OnceCell<Regex> = OnceCell::new();
        let re_author = RE_AUTHOR.get_or_init(|| {
            Regex::new(r#"(?is)<small[^>]*class="[^"]*\bauthor\b[^"]*"[^>]*>(.*?)</small>"#)
                .unwrap()
        });

        let mut out = Vec::new();
        for block in re_block.captures_iter(html) {
            let chunk = &block[1];
            let Some(text_m) = re_text.captures(chunk) else {
                continue;
            };
            let text = strip_wrapping_quotes(&normalize_text(&text_m[1])).to_string();
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
                source: SourceId::ToScrape,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("scrape_parse_ms").record(ms);
        counter!("scrape_quotes_total").increment(out.len() as u64);
        out
    }
}

#[async_trait]
impl QuoteSite for ToScrapeSite {
    fn id(&self) -> SourceId {
        SourceId::ToScrape
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
            .map_err(|e| SourceError::fetch(SourceId::ToScrape, e))?;
        let html = std::str::from_utf8(&body)
            .map_err(|e| SourceError::parse(SourceId::ToScrape, e.to_string()))?;

        let quotes = self.parse(html);
        if quotes.is_empty() {
            // Upstream markup drift shows up here first.
            tracing::warn!(url = %url, "no quote blocks matched");
        }
        Ok(quotes)
    }
}
