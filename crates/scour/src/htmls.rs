// ABOUTME: Parser adapter over dom_query plus title and body helpers.
// ABOUTME: Parses raw HTML, resolves relative links, and extracts/shortens the page title.

use dom_query::Document;
use log::debug;
use url::Url;

use crate::dom::text::clean;

/// Parse raw HTML into a document, resolving `a[href]` and `img[src]` to
/// absolute URLs when a page URL is known. A `<base href>` in the document
/// takes precedence over the supplied URL.
pub fn parse(html: &str, url: Option<&str>) -> Document {
    let doc = Document::from(html);
    let base = base_href(&doc).or_else(|| url.map(str::to_string));
    if let Some(base) = base {
        match Url::parse(&base) {
            Ok(base) => {
                resolve_attr(&doc, "a", "href", &base);
                resolve_attr(&doc, "img", "src", &base);
            }
            Err(err) => debug!("not resolving links, base {} is invalid: {}", base, err),
        }
    }
    doc
}

fn base_href(doc: &Document) -> Option<String> {
    let sel = doc.select("base[href]");
    if sel.length() > 0 {
        sel.first().attr("href").map(|v| v.to_string())
    } else {
        None
    }
}

fn resolve_attr(doc: &Document, tag: &str, name: &str, base: &Url) {
    for el in doc.select(&format!("{}[{}]", tag, name)).iter() {
        if let Some(value) = el.attr(name) {
            if let Ok(resolved) = base.join(&value) {
                el.set_attr(name, resolved.as_str());
            }
        }
    }
}

/// The page's `<title>` text, or the empty string.
pub fn get_title(doc: &Document) -> String {
    let sel = doc.select("title");
    if sel.length() == 0 {
        return String::new();
    }
    clean(&sel.first().text())
}

/// Serialization of the page's `<body>`, or the empty string.
pub fn get_body(doc: &Document) -> String {
    let sel = doc.select("body");
    if sel.length() == 0 {
        return String::new();
    }
    sel.first().html().to_string()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The title with site-name suffixes stripped.
///
/// Sites love `Story headline | Site Name`; split on the usual separators and
/// keep whichever side still reads like a headline. The original title wins
/// whenever the shortened form ends up implausibly short or long.
pub fn shorten_title(doc: &Document) -> String {
    let orig = get_title(doc);
    if orig.is_empty() {
        return orig;
    }

    let mut title = orig.clone();
    let mut split = false;

    for delimiter in [" | ", " - ", " :: ", " / "] {
        if orig.contains(delimiter) {
            split = true;
            let first = orig.split(delimiter).next().unwrap_or("");
            let last = orig.rsplit(delimiter).next().unwrap_or("");
            if word_count(first) >= 4 {
                title = first.to_string();
            } else if word_count(last) >= 4 {
                title = last.to_string();
            }
            break;
        }
    }

    if !split {
        if let Some(index) = orig.find(": ") {
            let last = orig.rsplit(": ").next().unwrap_or("");
            title = if word_count(last) >= 4 {
                last.to_string()
            } else {
                orig[index + 2..].to_string()
            };
        }
    }

    let length = title.chars().count();
    if length > 15 && length < 150 {
        title
    } else {
        orig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_title() {
        let doc = parse(
            "<html><head><title>  test   title </title></head><body></body></html>",
            None,
        );
        assert_eq!(get_title(&doc), "test title");
    }

    #[test]
    fn test_get_title_missing() {
        let doc = parse("<html><body><p>no title here</p></body></html>", None);
        assert_eq!(get_title(&doc), "");
    }

    #[test]
    fn test_get_body_serializes_body() {
        let doc = parse("<html><body><p>hello</p></body></html>", None);
        let body = get_body(&doc);
        assert!(body.starts_with("<body"));
        assert!(body.contains("<p>hello</p>"));
    }

    #[test]
    fn test_relative_links_resolve_against_url() {
        let doc = parse(
            r#"<html><body><a href="/next/page2.html">next</a><img src="pic.png"></body></html>"#,
            Some("http://example.com/articles/story.html"),
        );
        let href = doc.select("a").first().attr("href").map(|v| v.to_string());
        assert_eq!(href.as_deref(), Some("http://example.com/next/page2.html"));
        let src = doc.select("img").first().attr("src").map(|v| v.to_string());
        assert_eq!(
            src.as_deref(),
            Some("http://example.com/articles/pic.png")
        );
    }

    #[test]
    fn test_base_element_wins_over_url() {
        let doc = parse(
            r#"<html><head><base href="http://cdn.example.com/"></head>
               <body><a href="page2.html">next</a></body></html>"#,
            Some("http://example.com/articles/story.html"),
        );
        let href = doc.select("a").first().attr("href").map(|v| v.to_string());
        assert_eq!(href.as_deref(), Some("http://cdn.example.com/page2.html"));
    }

    #[test]
    fn test_absolute_links_are_untouched() {
        let doc = parse(
            r#"<html><body><a href="http://other.com/x">x</a></body></html>"#,
            Some("http://example.com/"),
        );
        let href = doc.select("a").first().attr("href").map(|v| v.to_string());
        assert_eq!(href.as_deref(), Some("http://other.com/x"));
    }

    #[test]
    fn test_shorten_title_strips_site_suffix() {
        let doc = parse(
            "<html><head><title>The quick brown fox jumps the fence | Example News</title></head><body></body></html>",
            None,
        );
        assert_eq!(shorten_title(&doc), "The quick brown fox jumps the fence");
    }

    #[test]
    fn test_shorten_title_keeps_short_titles_whole() {
        let doc = parse(
            "<html><head><title>Home | Example</title></head><body></body></html>",
            None,
        );
        assert_eq!(shorten_title(&doc), "Home | Example");
    }

    #[test]
    fn test_shorten_title_colon_form() {
        let doc = parse(
            "<html><head><title>Example: a long headline about several things</title></head><body></body></html>",
            None,
        );
        assert_eq!(
            shorten_title(&doc),
            "a long headline about several things"
        );
    }
}
