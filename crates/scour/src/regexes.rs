// ABOUTME: Compile-once regular expressions shared across the extraction pipeline.
// ABOUTME: Candidate filtering, div-to-p detection, and next-page link scoring patterns.

use once_cell::sync::Lazy;
use regex::Regex;

/// Class/id fragments that mark an element as chrome rather than content.
pub static UNLIKELY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)combx|comment|community|disqus|extra|foot|header|menu|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|tweet|twitter").unwrap()
});

/// Class/id fragments that rescue an otherwise unlikely element.
pub static MAYBE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)and|article|body|column|main|shadow").unwrap());

pub static POSITIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|main|page|pagination|post|text|blog|story").unwrap()
});

pub static NEGATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)combx|comment|com-|contact|foot|footer|footnote|masthead|media|meta|outbrain|promo|related|scroll|shoutbox|sidebar|sponsor|shopping|tags|tool|widget").unwrap()
});

/// Link text that cannot be a next-page link (share, print, login, ...).
pub static EXTRANEOUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)print|archive|comment|discuss|e[-]?mail|share|reply|all|login|sign|single").unwrap()
});

/// Opening tags that keep a div from being rewritten into a paragraph.
pub static DIV_TO_P_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(a|blockquote|dl|div|img|ol|p|pre|table|ul)").unwrap());

// Match: next, continue, >, >>, but not >|, which usually means last.
pub static NEXT_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(next|weiter|continue|>[^|]$)").unwrap());

pub static PREV_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(prev|earl|old|new|<)").unwrap());

pub static PAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pag(e|ing|inat)").unwrap());

pub static FIRST_LAST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(first|last)").unwrap());
