// src/scrape/mod.rs
pub mod config;
pub mod sites;
pub mod types;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

use crate::fetch::Fetch;
use crate::scrape::types::{Quote, QuoteSite};

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scrape_quotes_total", "Quotes parsed from upstream sites.");
        describe_counter!("scrape_source_errors_total", "Site fetch/parse errors.");
        describe_counter!(
            "scrape_dedup_total",
            "Quotes dropped as cross-site duplicates."
        );
        describe_counter!(
            "scrape_deadline_abandoned_total",
            "Site tasks abandoned at the overall deadline."
        );
        describe_histogram!("scrape_parse_ms", "Site parse time in milliseconds.");
        describe_gauge!(
            "quote_cache_ttl_secs",
            "Configured response cache TTL in seconds."
        );
    });
}

/// Normalize extracted markup to plain text: decode entities, strip tags,
/// unify typographic quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Trim surrounding whitespace plus wrapping quote marks. Sites differ on
/// whether the text comes wrapped in typographic quotes.
pub fn strip_wrapping_quotes(s: &str) -> &str {
    s.trim()
        .trim_matches(|c: char| {
            matches!(
                c,
                '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '\u{00AB}'
                    | '\u{00BB}'
            )
        })
        .trim()
}

/// Equality key for deduplication: case-insensitive text, ignoring
/// surrounding whitespace and quote marks. Attribution is deliberately not
/// part of the key; the same quote is often credited differently across
/// sites, and first-seen attribution wins.
pub fn dedup_key(text: &str) -> String {
    strip_wrapping_quotes(text).to_lowercase()
}

/// Merge per-site lists (already in priority order) into one list, keeping
/// the first occurrence of each text.
pub fn merge_dedup(lists: Vec<Vec<Quote>>) -> Vec<Quote> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    let mut dropped = 0usize;
    for list in lists {
        for q in list {
            if seen.insert(dedup_key(&q.text)) {
                out.push(q);
            } else {
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        counter!("scrape_dedup_total").increment(dropped as u64);
    }
    out
}

/// Run every site concurrently and merge whatever finishes inside
/// `overall_deadline`. Sites still running at the deadline are abandoned,
/// not aborted; their per-call fetch timeout unwinds the connection.
///
/// The merge order depends only on the declaration order of the site slice,
/// never on completion timing, so identical site outputs always produce an
/// identical list.
pub async fn aggregate(
    sites: &[Arc<dyn QuoteSite>],
    fetcher: Arc<dyn Fetch>,
    overall_deadline: Duration,
    category: Option<&str>,
) -> Vec<Quote> {
    ensure_metrics_described();

    let deadline = tokio::time::Instant::now() + overall_deadline;

    let mut handles = Vec::with_capacity(sites.len());
    for site in sites {
        let id = site.id();
        let site = Arc::clone(site);
        let fetcher = Arc::clone(&fetcher);
        let category = category.map(str::to_owned);
        let handle = tokio::spawn(async move {
            site.fetch_and_parse(fetcher.as_ref(), category.as_deref())
                .await
        });
        handles.push((id, handle));
    }

    // Join in declaration order under one shared deadline.
    let mut lists = Vec::with_capacity(handles.len());
    for (id, mut handle) in handles {
        match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(Ok(quotes))) => lists.push(quotes),
            Ok(Ok(Err(err))) => {
                tracing::warn!(source = %id, error = %err, "site failed");
                counter!("scrape_source_errors_total").increment(1);
            }
            Ok(Err(join_err)) => {
                tracing::warn!(source = %id, error = %join_err, "site task panicked");
                counter!("scrape_source_errors_total").increment(1);
            }
            Err(_) => {
                // Stop waiting; the task keeps running and unwinds on its own.
                tracing::warn!(source = %id, "abandoned at overall deadline");
                counter!("scrape_deadline_abandoned_total").increment(1);
            }
        }
    }

    if lists.iter().all(|l| l.is_empty()) {
        tracing::warn!("no upstream site produced quotes; serving empty list");
    }

    merge_dedup(lists)
}
