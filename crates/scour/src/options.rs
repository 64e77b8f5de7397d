// ABOUTME: Configuration options for extraction and the fluent Document builder.
// ABOUTME: Carries the page URL, length thresholds, and the injected fetcher.

use std::fmt;
use std::sync::Arc;

use crate::document::Document;
use crate::fetch::Fetcher;

/// Paragraphs shorter than this many visible characters are not scored.
pub const TEXT_LENGTH_THRESHOLD: usize = 25;

/// Cleaned output shorter than this many characters triggers the lenient
/// retry.
pub const RETRY_LENGTH: usize = 250;

/// Configuration for a [`Document`].
#[derive(Clone, Default)]
pub struct Options {
    /// Page URL used for link resolution and next-page discovery.
    pub url: Option<String>,
    /// Fetcher used for multi-page traversal; `None` falls back to the
    /// default HTTP fetcher when a next page is actually followed.
    pub fetcher: Option<Arc<dyn Fetcher>>,
    pub min_text_length: Option<usize>,
    pub retry_length: Option<usize>,
}

impl Options {
    pub(crate) fn min_text_length(&self) -> usize {
        self.min_text_length.unwrap_or(TEXT_LENGTH_THRESHOLD)
    }

    pub(crate) fn retry_length(&self) -> usize {
        self.retry_length.unwrap_or(RETRY_LENGTH)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("url", &self.url)
            .field("fetcher", &self.fetcher.as_ref().map(|_| "custom"))
            .field("min_text_length", &self.min_text_length)
            .field("retry_length", &self.retry_length)
            .finish()
    }
}

/// Builder for [`Document`] instances with custom settings.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    opts: Options,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the page URL used for link resolution and next-page discovery.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.opts.url = Some(url.into());
        self
    }

    /// Inject the fetcher used for multi-page traversal.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.opts.fetcher = Some(fetcher);
        self
    }

    /// Minimum visible length before a paragraph is scored.
    pub fn min_text_length(mut self, length: usize) -> Self {
        self.opts.min_text_length = Some(length);
        self
    }

    /// Minimum acceptable cleaned-output length before the lenient retry.
    pub fn retry_length(mut self, length: usize) -> Self {
        self.opts.retry_length = Some(length);
        self
    }

    /// Build the document over the given HTML.
    pub fn build(self, html: impl Into<String>) -> Document {
        Document::with_options(html.into(), self.opts)
    }
}
