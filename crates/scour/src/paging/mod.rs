// ABOUTME: Multi-page assembly: page wrapping, duplicate detection, and the capped append loop.
// ABOUTME: Fetches subsequent pages through the injected fetcher and extracts each with the main loop.

//! Multi-page article handling.
//!
//! When a page carries a convincing next-page link, the assembler fetches the
//! chain page by page, extracts each one, wraps every result in its own
//! `article-page` div, and stops on fetch failure, duplication, or the page
//! cap.

pub mod base_url;
pub mod next_link;

use std::collections::HashSet;

use dom_query::Document;
use log::{debug, warn};

use crate::error::ExtractError;
use crate::extract;
use crate::fetch::Fetcher;
use crate::htmls;
use crate::paging::next_link::find_next_page_url;

/// The maximum number of pages appended to one article. Bad next-page
/// guesses would otherwise crawl many, many pages.
pub const MAX_PAGES: usize = 10;

/// Class carried by each per-page wrapper div in the combined output.
pub const PAGE_CLASS: &str = "article-page";

pub fn page_id(index: usize) -> String {
    format!("page-{}", index + 1)
}

/// One extracted page, re-tagged for the combined article document.
#[derive(Debug)]
pub struct ArticlePage {
    pub html: String,
    pub first_paragraph: Option<String>,
}

impl ArticlePage {
    /// Re-tag an extracted `<div id="page">` fragment as page N of the
    /// combined article and remember its first paragraph for duplicate
    /// checks.
    pub fn new(index: usize, fragment: &str) -> Result<Self, ExtractError> {
        let doc = Document::from(fragment);
        let root = doc.select("div");
        if root.length() == 0 {
            return Err(ExtractError::unparseable(
                "",
                "MakePage",
                Some(anyhow::anyhow!("article fragment has no element root")),
            ));
        }
        let root = root.first();
        root.set_attr("id", &page_id(index));
        root.set_attr("class", PAGE_CLASS);
        let html = root.html().to_string();

        let paragraphs = doc.select("p");
        let first_paragraph = if paragraphs.length() > 0 {
            Some(paragraphs.first().text().to_string())
        } else {
            None
        };

        Ok(Self {
            html,
            first_paragraph,
        })
    }
}

/// Sites sometimes serve the same content under several page URLs. Two pages
/// are suspected duplicates when their first paragraphs carry identical
/// string content.
pub fn is_suspected_duplicate(pages: &[ArticlePage], page: &ArticlePage) -> bool {
    let Some(ref text) = page.first_paragraph else {
        return false;
    };
    pages
        .iter()
        .any(|existing| existing.first_paragraph.as_deref() == Some(text.as_str()))
}

/// Fetch, extract, and append the chain of next pages starting at
/// `page_url`. Fetch failures end the chain with a warning; everything
/// collected so far stands.
#[allow(clippy::too_many_arguments)]
pub fn append_next_page(
    fetcher: &dyn Fetcher,
    parsed_urls: &mut HashSet<String>,
    page_index: usize,
    page_url: &str,
    pages: &mut Vec<ArticlePage>,
    min_text_length: usize,
    retry_length: usize,
) {
    debug!("appending next page: {}", page_url);
    if page_index >= MAX_PAGES {
        return;
    }

    let html = match fetcher.urlread(page_url) {
        Ok(html) => html,
        Err(err) => {
            warn!("exception fetching {}: {:#}", page_url, err);
            return;
        }
    };

    // Chain discovery has to see the page before extraction mutates it.
    let next_page_url = {
        let page_doc = htmls::parse(&html, Some(page_url));
        find_next_page_url(parsed_urls, Some(page_url), &page_doc)
    };

    let summary = extract::extract(&html, Some(page_url), min_text_length, retry_length);
    let Some(fragment) = summary.html else {
        debug!("no article found on {}", page_url);
        return;
    };

    let page = match ArticlePage::new(page_index, &fragment) {
        Ok(page) => page,
        Err(err) => {
            warn!("could not wrap page {}: {}", page_url, err);
            return;
        }
    };

    if is_suspected_duplicate(pages, &page) {
        debug!("{} looks like a page we already have, stopping", page_url);
        return;
    }

    pages.push(page);
    if let Some(ref next) = next_page_url {
        append_next_page(
            fetcher,
            parsed_urls,
            page_index + 1,
            next,
            pages,
            min_text_length,
            retry_length,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_id_is_one_based() {
        assert_eq!(page_id(0), "page-1");
        assert_eq!(page_id(2), "page-3");
    }

    #[test]
    fn test_article_page_retags_the_root() {
        let page = ArticlePage::new(1, r#"<div id="page"><p>hello world</p></div>"#)
            .expect("a wrapped page");
        assert!(page.html.contains(r#"id="page-2""#));
        assert!(page.html.contains(r#"class="article-page""#));
        assert_eq!(page.first_paragraph.as_deref(), Some("hello world"));
    }

    #[test]
    fn test_article_page_without_paragraph() {
        let page = ArticlePage::new(0, r#"<div id="page">bare text</div>"#).expect("a page");
        assert_eq!(page.first_paragraph, None);
    }

    #[test]
    fn test_article_page_rejects_non_element_fragment() {
        let err = ArticlePage::new(0, "just text").expect_err("no root div to re-tag");
        assert!(err.is_unparseable());
    }

    #[test]
    fn test_duplicate_detection_matches_first_paragraphs() {
        let existing = ArticlePage::new(
            0,
            r#"<div id="page"><p>same lead paragraph</p><p>rest one</p></div>"#,
        )
        .expect("page one");
        let duplicate = ArticlePage::new(
            1,
            r#"<div id="page"><p>same lead paragraph</p><p>rest two</p></div>"#,
        )
        .expect("page two");
        let unique = ArticlePage::new(
            1,
            r#"<div id="page"><p>a different lead paragraph</p></div>"#,
        )
        .expect("page three");

        let pages = vec![existing];
        assert!(is_suspected_duplicate(&pages, &duplicate));
        assert!(!is_suspected_duplicate(&pages, &unique));
    }

    #[test]
    fn test_pages_without_paragraphs_are_not_duplicates() {
        let existing =
            ArticlePage::new(0, r#"<div id="page">text</div>"#).expect("page one");
        let incoming =
            ArticlePage::new(1, r#"<div id="page">other</div>"#).expect("page two");
        assert!(!is_suspected_duplicate(&[existing], &incoming));
    }
}
