// ABOUTME: Reduces a page URL to its stem for next-page comparison.
// ABOUTME: Strips extensions, page-number suffixes, trailing numbers, and index segments.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static NON_ALPHA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z]").unwrap());
static PAGE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)((_|-)?p[a-z]*|(_|-))[0-9]{1,2}$").unwrap());
static PURE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}$").unwrap());
static ALPHA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[a-z]").unwrap());

/// Drop a file extension when the first dot-token after the name is purely
/// alphabetic; `article.html` reduces, `article.123not` does not.
fn clean_segment_extension(segment: &str) -> Option<String> {
    match segment.split_once('.') {
        None => Some(segment.to_string()),
        Some((stem, rest)) => {
            let possible_type = rest.split('.').next().unwrap_or("");
            if NON_ALPHA_RE.is_match(possible_type) {
                Some(segment.to_string())
            } else {
                Some(stem.to_string())
            }
        }
    }
}

// EW-CMS specific segment replacement. Ugly.
// Example: http://www.ew.com/ew/article/0,,20313460_20369436,00.html
fn clean_segment_ewcms(segment: &str) -> Option<String> {
    Some(segment.replace(",00", ""))
}

/// Strip a trailing page-number suffix from one of the last two segments.
fn clean_segment_page_number(total: usize, index: usize, segment: &str) -> Option<String> {
    if index + 2 >= total {
        let cleaned = PAGE_NUMBER_RE.replace(segment, "");
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    } else {
        Some(segment.to_string())
    }
}

/// A bare one- or two-digit segment near the end is probably a page number.
fn clean_segment_number(total: usize, index: usize, segment: &str) -> Option<String> {
    if index + 2 >= total && PURE_NUMBER_RE.is_match(segment) {
        None
    } else {
        Some(segment.to_string())
    }
}

fn clean_segment_index(total: usize, index: usize, segment: &str) -> Option<String> {
    if index + 1 == total && segment.eq_ignore_ascii_case("index") {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Drop a short trailing segment when the final segment carries no letters.
fn clean_segment_short(segments: &[String], index: usize, segment: &str) -> Option<String> {
    let last = segments.last().map(String::as_str).unwrap_or("");
    if index + 2 >= segments.len() && segment.chars().count() < 3 && !ALPHA_RE.is_match(last) {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Run one path segment through the cleaning chain; `None` drops it.
fn clean_segment(segments: &[String], index: usize, segment: &str) -> Option<String> {
    let total = segments.len();
    let mut cleaned = Some(segment.to_string());
    cleaned = cleaned.and_then(|s| clean_segment_extension(&s));
    cleaned = cleaned.and_then(|s| clean_segment_ewcms(&s));
    cleaned = cleaned.and_then(|s| clean_segment_page_number(total, index, &s));
    cleaned = cleaned.and_then(|s| clean_segment_number(total, index, &s));
    cleaned = cleaned.and_then(|s| clean_segment_index(total, index, &s));
    cleaned = cleaned.and_then(|s| clean_segment_short(segments, index, &s));
    cleaned
}

/// Reduce a page URL to the stem used when judging whether candidate hrefs
/// point at more pages of the same article. Query and fragment are dropped.
pub fn find_base_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<String> = parsed.path().split('/').map(str::to_string).collect();
    let cleaned: Vec<String> = segments
        .iter()
        .enumerate()
        .filter_map(|(index, segment)| clean_segment(&segments, index, segment))
        .collect();
    let path = cleaned.join("/");

    let host = parsed.host_str().unwrap_or("");
    let port = parsed
        .port()
        .map(|p| format!(":{}", p))
        .unwrap_or_default();

    let base = if path.is_empty() {
        format!("{}://{}{}", parsed.scheme(), host, port)
    } else if path.starts_with('/') {
        format!("{}://{}{}{}", parsed.scheme(), host, port, path)
    } else {
        format!("{}://{}{}/{}", parsed.scheme(), host, port, path)
    };
    Some(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_base(url: &str, expected: &str) {
        assert_eq!(find_base_url(url).as_deref(), Some(expected), "for {}", url);
    }

    #[test]
    fn test_no_change() {
        assert_base("http://foo.com/article", "http://foo.com/article");
    }

    #[test]
    fn test_extension_stripping() {
        assert_base("http://foo.com/article.html", "http://foo.com/article");
        assert_base(
            "http://foo.com/path/to/article.html",
            "http://foo.com/path/to/article",
        );
        assert_base(
            "http://foo.com/article.123not",
            "http://foo.com/article.123not",
        );
        assert_base(
            "http://foo.com/path/to/article.123not",
            "http://foo.com/path/to/article.123not",
        );
    }

    #[test]
    fn test_ewcms() {
        assert_base(
            "http://www.ew.com/ew/article/0,,20313460_20369436,00.html",
            "http://www.ew.com/ew/article/0,,20313460_20369436",
        );
    }

    #[test]
    fn test_page_numbers() {
        assert_base("http://foo.com/page5.html", "http://foo.com");
        assert_base("http://foo.com/path/to/page5.html", "http://foo.com/path/to");
        assert_base("http://foo.com/article-5.html", "http://foo.com/article");
    }

    #[test]
    fn test_numbers() {
        assert_base("http://foo.com/5.html", "http://foo.com");
        assert_base("http://foo.com/path/to/5.html", "http://foo.com/path/to");
    }

    #[test]
    fn test_index() {
        assert_base("http://foo.com/index.html", "http://foo.com");
        assert_base("http://foo.com/path/to/index.html", "http://foo.com/path/to");
    }

    #[test]
    fn test_short() {
        assert_base("http://foo.com/en/1234567890", "http://foo.com/1234567890");
        assert_base(
            "http://foo.com/en/de/1234567890",
            "http://foo.com/en/1234567890",
        );
    }

    #[test]
    fn test_query_and_fragment_dropped() {
        assert_base(
            "http://foo.com/article.html?page=2#section",
            "http://foo.com/article",
        );
    }

    #[test]
    fn test_idempotent() {
        let urls = [
            "http://foo.com/article.html",
            "http://foo.com/page5.html",
            "http://foo.com/en/1234567890",
            "http://www.ew.com/ew/article/0,,20313460_20369436,00.html",
        ];
        for url in urls {
            let once = find_base_url(url).expect("a base URL");
            let twice = find_base_url(&once).expect("a base URL");
            assert_eq!(once, twice, "for {}", url);
        }
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(find_base_url("not a url"), None);
    }
}
