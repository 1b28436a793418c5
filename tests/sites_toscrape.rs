// tests/sites_toscrape.rs
//
// Fixture-driven parse tests for the quotes.toscrape.com adapter.

use std::time::Duration;

use async_trait::async_trait;
use quote_harvester::fetch::{Fetch, FetchError};
use quote_harvester::scrape::sites::toscrape::{ToScrapeSite, DEFAULT_BASE_URL};
use quote_harvester::scrape::types::{QuoteSite, SourceErrorKind, SourceId};

const PAGE: &str = include_str!("fixtures/toscrape.html");

struct FixtureFetcher(&'static str);

#[async_trait]
impl Fetch for FixtureFetcher {
    async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
        Ok(self.0.as_bytes().to_vec())
    }
}

struct FailingFetcher;

#[async_trait]
impl Fetch for FailingFetcher {
    async fn fetch(&self, _url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::Timeout(timeout))
    }
}

fn site() -> ToScrapeSite {
    ToScrapeSite::new(DEFAULT_BASE_URL.to_string(), Duration::from_secs(5))
}

#[tokio::test]
async fn fixture_parses_and_yields_quotes() {
    let quotes = site()
        .fetch_and_parse(&FixtureFetcher(PAGE), None)
        .await
        .expect("toscrape parse ok");

    assert_eq!(quotes.len(), 3);
    assert!(
        quotes.iter().all(|q| !q.text.trim().is_empty()),
        "every quote should have non-empty text"
    );
    assert!(quotes.iter().all(|q| q.source == SourceId::ToScrape));

    assert_eq!(
        quotes[0].text,
        "The world as we have created it is a process of our thinking. \
         It cannot be changed without changing our thinking."
    );
    assert_eq!(quotes[0].author, "Albert Einstein");
}

#[tokio::test]
async fn nested_markup_is_stripped_to_plain_text() {
    let quotes = site()
        .fetch_and_parse(&FixtureFetcher(PAGE), None)
        .await
        .expect("toscrape parse ok");

    let rowling = &quotes[1];
    assert_eq!(
        rowling.text,
        "It is our choices, Harry, that show what we truly are, far more than our abilities."
    );
    assert!(!rowling.text.contains('<'), "tags must not leak into text");
}

#[tokio::test]
async fn missing_author_becomes_unknown() {
    let quotes = site()
        .fetch_and_parse(&FixtureFetcher(PAGE), None)
        .await
        .expect("toscrape parse ok");

    assert_eq!(quotes[2].text, "A day without sunshine is like, you know, night.");
    assert_eq!(quotes[2].author, "Unknown");
}

#[tokio::test]
async fn page_without_quote_blocks_yields_empty_list_not_error() {
    let quotes = site()
        .fetch_and_parse(
            &FixtureFetcher("<html><body><p>redesigned page</p></body></html>"),
            None,
        )
        .await
        .expect("markup drift must not be an error");
    assert!(quotes.is_empty());
}

#[tokio::test]
async fn fetch_failure_is_wrapped_with_source() {
    let err = site()
        .fetch_and_parse(&FailingFetcher, None)
        .await
        .expect_err("fetch failure must surface as a source error");

    assert_eq!(err.source, SourceId::ToScrape);
    assert!(matches!(
        err.kind,
        SourceErrorKind::Fetch(FetchError::Timeout(_))
    ));
}
