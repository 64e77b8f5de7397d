// ABOUTME: Text-level helpers shared by scoring, cleaning, and paging.
// ABOUTME: Whitespace normalization, visible text length, link density, class/id weighting.

use dom_query::{NodeRef, Selection};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::regexes::{NEGATIVE_RE, POSITIVE_RE};

static NEWLINE_RUNS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());
static SPACE_RUNS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Collapse whitespace the way visible length is measured everywhere:
/// newline runs become one newline, space/tab runs one space, ends trimmed.
pub fn clean(text: &str) -> String {
    let text = NEWLINE_RUNS_RE.replace_all(text, "\n");
    let text = SPACE_RUNS_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Visible text length of a node's subtree.
pub fn text_length(node: &NodeRef) -> usize {
    clean(&node.text()).chars().count()
}

/// Fraction of a node's visible text that sits inside `<a>` descendants.
pub fn link_density(node: &NodeRef) -> f64 {
    let sel = Selection::from(node.clone());
    let link_length: usize = sel.select("a").nodes().iter().map(text_length).sum();
    link_length as f64 / text_length(node).max(1) as f64
}

/// Score an element's class and id against the positive/negative name lists.
pub fn class_weight(node: &NodeRef) -> i32 {
    let mut weight = 0;
    for name in ["class", "id"] {
        let value = attr_or_empty(node, name);
        if value.is_empty() {
            continue;
        }
        if NEGATIVE_RE.is_match(&value) {
            weight -= 25;
        }
        if POSITIVE_RE.is_match(&value) {
            weight += 25;
        }
    }
    weight
}

/// Commas in raw text; more commas generally means real prose.
pub fn comma_count(text: &str) -> usize {
    text.matches(',').count()
}

pub(crate) fn attr_or_empty(node: &NodeRef, name: &str) -> String {
    Selection::from(node.clone())
        .attr(name)
        .map(|v| v.to_string())
        .unwrap_or_default()
}

pub(crate) fn tag_name(node: &NodeRef) -> String {
    node.node_name()
        .map(|n| n.to_lowercase())
        .unwrap_or_default()
}

/// Compact `tag#id.class` label of a node and its parent, for debug logging.
pub fn describe(node: &NodeRef) -> String {
    fn label(node: &NodeRef) -> String {
        let mut name = tag_name(node);
        let id = attr_or_empty(node, "id");
        if !id.is_empty() {
            name.push('#');
            name.push_str(&id);
        }
        let class = attr_or_empty(node, "class");
        if !class.is_empty() {
            name.push('.');
            name.push_str(&class.replace(' ', "."));
        }
        name
    }
    match node.parent() {
        Some(parent) => format!("{} - {}", label(node), label(&parent)),
        None => label(node),
    }
}
