// ABOUTME: Paragraph scoring, best-candidate selection, and sibling assembly.
// ABOUTME: Builds the per-document candidate map keyed by node identity.

use std::collections::HashMap;

use dom_query::{Document, NodeId, NodeRef, Selection};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::text::{
    class_weight, clean, comma_count, describe, link_density, tag_name,
};

static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.( |$)").unwrap());

/// A scored element. The map key is the element's identity, never its value.
pub struct Candidate<'a> {
    pub node: NodeRef<'a>,
    pub content_score: f64,
}

pub type CandidateMap<'a> = HashMap<NodeId, Candidate<'a>>;

/// Base score for an element: class/id weight plus a tag-kind bonus.
fn score_node<'a>(node: &NodeRef<'a>) -> Candidate<'a> {
    let mut content_score = f64::from(class_weight(node));
    content_score += match tag_name(node).as_str() {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    Candidate {
        node: node.clone(),
        content_score,
    }
}

/// Score every paragraph-like element's parent and grandparent.
///
/// Returns the candidate map plus first-registration order, which doubles as
/// the deterministic tie-break for [`select_best`]. Scores are attenuated by
/// link density at the end: good content has a small link density and is
/// mostly unaffected.
pub fn score_paragraphs<'a>(
    doc: &'a Document,
    min_text_len: usize,
) -> (CandidateMap<'a>, Vec<NodeId>) {
    let mut candidates = CandidateMap::new();
    let mut ordered: Vec<NodeId> = Vec::new();

    let paragraphs: Vec<NodeRef> = doc.select("p, pre, td").nodes().iter().cloned().collect();
    for elem in &paragraphs {
        let Some(parent) = elem.parent() else {
            continue;
        };
        let grandparent = parent.parent();

        let inner_text = clean(&elem.text());
        let inner_text_len = inner_text.chars().count();

        // Paragraphs this short don't even count.
        if inner_text_len < min_text_len {
            continue;
        }

        if !candidates.contains_key(&parent.id) {
            candidates.insert(parent.id, score_node(&parent));
            ordered.push(parent.id);
        }
        if let Some(ref gp) = grandparent {
            if !candidates.contains_key(&gp.id) {
                candidates.insert(gp.id, score_node(gp));
                ordered.push(gp.id);
            }
        }

        let content_score =
            1.0 + comma_count(&inner_text) as f64 + (inner_text_len / 100).min(3) as f64;

        if let Some(candidate) = candidates.get_mut(&parent.id) {
            candidate.content_score += content_score;
        }
        if let Some(ref gp) = grandparent {
            if let Some(candidate) = candidates.get_mut(&gp.id) {
                candidate.content_score += content_score / 2.0;
            }
        }
    }

    for id in &ordered {
        let Some(candidate) = candidates.get_mut(id) else {
            continue;
        };
        let node = candidate.node.clone();
        let density = link_density(&node);
        debug!(
            "candidate {:6.3} {} link density {:.3}",
            candidate.content_score,
            describe(&node),
            density
        );
        candidate.content_score *= 1.0 - density;
    }

    (candidates, ordered)
}

/// The highest-scoring candidate; the first-registered one wins a tie.
pub fn select_best<'a, 'b>(
    candidates: &'b CandidateMap<'a>,
    ordered: &[NodeId],
) -> Option<&'b Candidate<'a>> {
    let mut best: Option<&Candidate> = None;
    for id in ordered {
        let Some(candidate) = candidates.get(id) else {
            continue;
        };
        if best.map_or(true, |b| candidate.content_score > b.content_score) {
            best = Some(candidate);
        }
    }
    if let Some(best) = best {
        debug!(
            "best candidate {:6.3} {}",
            best.content_score,
            describe(&best.node)
        );
    }
    best
}

/// Text of a node before its first element child.
fn leading_text(node: &NodeRef) -> String {
    let mut out = String::new();
    for child in node.children_it(false) {
        if child.is_text() {
            out.push_str(&child.text());
        } else if child.is_element() {
            break;
        }
    }
    out
}

/// Move the best candidate and its qualifying siblings into a fresh
/// `<div id="page">`. Siblings join when they carry a fifth of the winning
/// score themselves, or when they read like a real paragraph: preambles and
/// content split by stripped ads tend to sit next to the winner.
pub fn assemble_siblings<'a>(
    doc: &'a Document,
    best: &Candidate<'a>,
    candidates: &CandidateMap<'a>,
) -> NodeRef<'a> {
    let article = doc.tree.new_element("div");
    Selection::from(article.clone()).set_attr("id", "page");

    let Some(parent) = best.node.parent() else {
        best.node.remove_from_parent();
        article.append_child(&best.node);
        return article;
    };

    let sibling_score_threshold = 10.0_f64.max(best.content_score * 0.2);
    let siblings: Vec<NodeRef> = Selection::from(parent)
        .children()
        .nodes()
        .iter()
        .cloned()
        .collect();

    for sibling in siblings {
        let mut append = sibling.id == best.node.id;

        match candidates.get(&sibling.id) {
            Some(candidate) => {
                debug!("sibling {:6.3} {}", candidate.content_score, describe(&sibling));
                if candidate.content_score >= sibling_score_threshold {
                    append = true;
                }
            }
            None => debug!("sibling {}", describe(&sibling)),
        }

        if tag_name(&sibling) == "p" {
            let density = link_density(&sibling);
            let node_content = leading_text(&sibling);
            let node_length = node_content.chars().count();

            if node_length > 80 && density < 0.25 {
                append = true;
            } else if node_length < 80 && density == 0.0 && SENTENCE_END_RE.is_match(&node_content)
            {
                append = true;
            }
        }

        if append {
            sibling.remove_from_parent();
            article.append_child(&sibling);
        }
    }

    article
}
