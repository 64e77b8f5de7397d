// ABOUTME: Public facade over the extraction pipeline.
// ABOUTME: Exposes title, body, and the multi-page summary of one HTML page.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ExtractError;
use crate::extract::{self, Summary};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::htmls;
use crate::options::{DocumentBuilder, Options};
use crate::paging::{self, next_link::find_next_page_url, ArticlePage};

/// One HTML page plus the options controlling its extraction.
///
/// A `Document` owns its input; every accessor parses fresh, so the
/// extraction passes can mutate their own tree freely.
pub struct Document {
    input: String,
    options: Options,
}

impl Document {
    /// Wrap raw HTML with default options.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            input: html.into(),
            options: Options::default(),
        }
    }

    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    pub(crate) fn with_options(html: String, options: Options) -> Self {
        Self {
            input: html,
            options,
        }
    }

    pub(crate) fn options(&self) -> &Options {
        &self.options
    }

    /// The page's `<title>` text, or the empty string.
    pub fn title(&self) -> String {
        htmls::get_title(&htmls::parse(&self.input, self.options.url.as_deref()))
    }

    /// The title with site-name suffixes stripped.
    pub fn short_title(&self) -> String {
        htmls::shorten_title(&htmls::parse(&self.input, self.options.url.as_deref()))
    }

    /// Serialization of the page's `<body>`.
    pub fn content(&self) -> String {
        htmls::get_body(&htmls::parse(&self.input, self.options.url.as_deref()))
    }

    /// Extract the readable article.
    ///
    /// The primary page goes through the ruthless/lenient loop; when it
    /// yields an article and the page carries a convincing next-page link,
    /// subsequent pages are fetched, extracted, and appended as their own
    /// `article-page` divs inside the `<div id="article">` wrapper.
    pub fn summary(&self) -> Result<Summary, ExtractError> {
        let url = self.options.url.as_deref();
        let min_text_length = self.options.min_text_length();
        let retry_length = self.options.retry_length();

        let mut parsed_urls: HashSet<String> = HashSet::new();
        if let Some(url) = url {
            parsed_urls.insert(url.to_string());
        }

        let page_0 = extract::extract(&self.input, url, min_text_length, retry_length);
        let Some(fragment) = page_0.html else {
            return Ok(Summary::none());
        };

        // Discovery runs on a pristine tree; extraction worked on its own.
        let next_page_url = {
            let doc = htmls::parse(&self.input, url);
            find_next_page_url(&mut parsed_urls, url, &doc)
        };

        let mut pages = vec![ArticlePage::new(0, &fragment)?];
        if let Some(ref next) = next_page_url {
            let fetcher: Arc<dyn Fetcher> = match self.options.fetcher.clone() {
                Some(fetcher) => fetcher,
                None => Arc::new(HttpFetcher::default()),
            };
            paging::append_next_page(
                fetcher.as_ref(),
                &mut parsed_urls,
                1,
                next,
                &mut pages,
                min_text_length,
                retry_length,
            );
        }

        let mut body = String::new();
        for page in &pages {
            body.push_str(&page.html);
        }
        Ok(Summary {
            confidence: page_0.confidence,
            html: Some(format!(r#"<div id="article">{}</div>"#, body)),
        })
    }
}
