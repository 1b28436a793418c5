// src/scrape/types.rs
use async_trait::async_trait;
use thiserror::Error;

use crate::fetch::{Fetch, FetchError};

/// Upstream sites, in merge-priority order. When two sites return the same
/// quote text, attribution from the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    ToScrape,
    Goodreads,
}

impl SourceId {
    pub fn label(self) -> &'static str {
        match self {
            SourceId::ToScrape => "toscrape",
            SourceId::Goodreads => "goodreads",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::error::Error for SourceId {}

/// One quotation, normalized to plain text. Immutable once constructed;
/// built fresh per aggregation run and dropped after serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
    pub source: SourceId,
}

#[derive(Debug, Error)]
pub enum SourceErrorKind {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("unparseable document: {0}")]
    Parse(String),
}

/// Failure scoped to a single upstream site. Logged and swallowed at the
/// aggregation boundary; never escapes to the HTTP layer.
#[derive(Debug, Error)]
#[error("{source}: {kind}")]
pub struct SourceError {
    pub source: SourceId,
    pub kind: SourceErrorKind,
}

impl SourceError {
    pub fn fetch(source: SourceId, err: FetchError) -> Self {
        Self {
            source,
            kind: SourceErrorKind::Fetch(err),
        }
    }

    pub fn parse(source: SourceId, msg: impl Into<String>) -> Self {
        Self {
            source,
            kind: SourceErrorKind::Parse(msg.into()),
        }
    }
}

/// One upstream site: where to fetch and how to turn its markup into quotes.
/// Implementations are stateless and safe to share across requests.
#[async_trait]
pub trait QuoteSite: Send + Sync {
    fn id(&self) -> SourceId;

    /// Listing URL, optionally narrowed to a tag/category page.
    fn url(&self, category: Option<&str>) -> String;

    async fn fetch_and_parse(
        &self,
        fetcher: &dyn Fetch,
        category: Option<&str>,
    ) -> Result<Vec<Quote>, SourceError>;
}
