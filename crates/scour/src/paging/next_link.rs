// ABOUTME: Scores every anchor on a page to find the most likely next-page link.
// ABOUTME: Candidates merge by href; the winner must clear an absolute score floor.

use std::collections::{HashMap, HashSet};

use dom_query::{Document, NodeRef, Selection};
use log::debug;
use url::Url;

use crate::dom::text::{attr_or_empty, clean};
use crate::paging::base_url::find_base_url;
use crate::regexes::{
    EXTRANEOUS_RE, FIRST_LAST_RE, NEGATIVE_RE, NEXT_LINK_RE, PAGE_RE, POSITIVE_RE, PREV_LINK_RE,
};

/// The score a candidate must reach before its href is worth following.
const SCORE_FLOOR: i32 = 50;

/// One href that might be the next page. Distinct from the content
/// candidates used while locating the article itself.
struct NextPageCandidate {
    href: String,
    link_text: String,
    score: i32,
}

fn strip_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

fn netloc(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Hosts match when equal; an unparseable or relative side counts as a match.
fn same_domain(lhs: &str, rhs: &str) -> bool {
    let (lhs, rhs) = (netloc(lhs), netloc(rhs));
    lhs.is_empty() || rhs.is_empty() || lhs == rhs
}

/// Find the URL of the likely next page, if any anchor scores high enough.
/// The chosen href is recorded in `parsed_urls` so later pages skip it.
pub fn find_next_page_url(
    parsed_urls: &mut HashSet<String>,
    url: Option<&str>,
    doc: &Document,
) -> Option<String> {
    let base_url = url.and_then(find_base_url);
    let mut candidates: Vec<NextPageCandidate> = Vec::new();
    let mut index_by_href: HashMap<String, usize> = HashMap::new();

    let links: Vec<NodeRef> = doc.select("a").nodes().iter().cloned().collect();
    for link in &links {
        eval_possible_next_page_link(
            parsed_urls,
            url,
            base_url.as_deref(),
            &mut candidates,
            &mut index_by_href,
            link,
        );
    }

    let mut top: Option<&NextPageCandidate> = None;
    for candidate in &candidates {
        debug!("next page score of {}: {}", candidate.href, candidate.score);
        if candidate.score >= SCORE_FLOOR && top.map_or(true, |t| t.score < candidate.score) {
            top = Some(candidate);
        }
    }

    let top = top?;
    debug!("next page link found: {}", top.href);
    parsed_urls.insert(top.href.clone());
    Some(top.href.clone())
}

fn eval_possible_next_page_link(
    parsed_urls: &HashSet<String>,
    url: Option<&str>,
    base_url: Option<&str>,
    candidates: &mut Vec<NextPageCandidate>,
    index_by_href: &mut HashMap<String, usize>,
    link: &NodeRef,
) {
    let Some(raw_href) = Selection::from(link.clone()).attr("href") else {
        debug!("link with no href");
        return;
    };
    let href = strip_trailing_slash(&raw_href).to_string();

    // Pages we have already seen, or the page itself, are not next pages.
    if Some(href.as_str()) == base_url || Some(href.as_str()) == url || parsed_urls.contains(&href)
    {
        debug!("rejecting {}: already seen page", href);
        return;
    }

    if let Some(page_url) = url {
        if !same_domain(page_url, &href) {
            debug!("rejecting {}: different domain", href);
            return;
        }
    }

    let link_text = clean(&link.text());
    if EXTRANEOUS_RE.is_match(&link_text) || link_text.chars().count() > 25 {
        debug!("rejecting {}: link text not ok", href);
        return;
    }

    // With no digit left after removing the base, this cannot be a page link.
    if let Some(base) = base_url {
        let leftover = href.replace(base, "");
        if !leftover.chars().any(|c| c.is_ascii_digit()) {
            debug!("rejecting {}: no digits", href);
            return;
        }
    }

    let index = match index_by_href.get(&href) {
        Some(&index) => {
            let existing = &mut candidates[index];
            debug!("found existing candidate with score {}", existing.score);
            existing.link_text.push_str(" | ");
            existing.link_text.push_str(&link_text);
            index
        }
        None => {
            candidates.push(NextPageCandidate {
                href: href.clone(),
                link_text: link_text.clone(),
                score: 0,
            });
            index_by_href.insert(href, candidates.len() - 1);
            candidates.len() - 1
        }
    };
    let candidate = &mut candidates[index];

    let link_data = format!(
        "{} {} {}",
        link_text,
        attr_or_empty(link, "class"),
        attr_or_empty(link, "id")
    );
    debug!("link_data: {}", link_data);

    if let Some(base) = base_url {
        if !candidate.href.starts_with(base) {
            candidate.score -= 25;
        }
    }
    if NEXT_LINK_RE.is_match(&link_data) {
        candidate.score += 50;
    }
    if PAGE_RE.is_match(&link_data) {
        candidate.score += 25;
    }
    if FIRST_LAST_RE.is_match(&link_data) {
        // Matching on "last" is fine when the text already matched "next";
        // otherwise this is probably a first/last pager link.
        if !NEXT_LINK_RE.is_match(&candidate.link_text) {
            candidate.score -= 65;
        }
    }
    if NEGATIVE_RE.is_match(&link_data) || EXTRANEOUS_RE.is_match(&link_data) {
        candidate.score -= 50;
    }
    if PREV_LINK_RE.is_match(&link_data) {
        candidate.score -= 200;
    }

    // Ancestor context: one page-ish bonus and one negative penalty at most,
    // from whichever ancestors supply them first.
    let mut positive_node_match = false;
    let mut negative_node_match = false;
    let mut parent = link.parent();
    while let Some(node) = parent {
        let combo = format!(
            "{} {}",
            attr_or_empty(&node, "class"),
            attr_or_empty(&node, "id")
        );
        if !positive_node_match && PAGE_RE.is_match(&combo) {
            positive_node_match = true;
            candidate.score += 25;
        }
        if !negative_node_match && NEGATIVE_RE.is_match(&combo) && !POSITIVE_RE.is_match(&combo) {
            negative_node_match = true;
            candidate.score -= 25;
        }
        parent = node.parent();
    }

    if PAGE_RE.is_match(&candidate.href) {
        candidate.score += 25;
    }
    if EXTRANEOUS_RE.is_match(&candidate.href) {
        candidate.score -= 15;
    }

    if let Ok(number) = link_text.parse::<i32>() {
        // Punish 1: we are either already there, or it's before what we want.
        if number == 1 {
            candidate.score -= 10;
        } else {
            candidate.score += (10 - number).max(0);
        }
    }

    debug!("final score for {} is {}", candidate.href, candidate.score);
}
