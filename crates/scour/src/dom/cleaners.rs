// ABOUTME: Post-selection sanitizer for the assembled article element.
// ABOUTME: Drops weak headers and forms, conditionally cleans table/ul/div subtrees, filters attributes.

use std::collections::HashSet;

use dom_query::{NodeId, NodeRef, Selection};
use log::debug;

use crate::dom::scoring::CandidateMap;
use crate::dom::text::{
    class_weight, comma_count, describe, link_density, tag_name, text_length,
};

/// Siblings on both sides of a subtree must carry more than this much text
/// before the subtree is rescued from conditional cleaning.
const RESCUE_SIBLING_LENGTH: usize = 1000;

enum Direction {
    Following,
    Preceding,
}

fn step<'a>(node: &NodeRef<'a>, direction: &Direction) -> Option<NodeRef<'a>> {
    match direction {
        Direction::Following => node.next_element_sibling(),
        Direction::Preceding => node.prev_element_sibling(),
    }
}

/// Visible length of the first sibling in the given direction that has any
/// text at all.
fn first_nonempty_sibling_length(node: &NodeRef, direction: Direction) -> Option<usize> {
    let mut current = step(node, &direction);
    while let Some(sibling) = current {
        let length = text_length(&sibling);
        if length > 0 {
            return Some(length);
        }
        current = step(&sibling, &direction);
    }
    None
}

/// Serialize cleaned HTML with presentational and unsafe attributes removed.
/// The id/class wrappers the assembler relies on survive the policy.
pub fn clean_attributes(html: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder.add_generic_attributes(&["id", "class", "width", "height"]);
    builder.link_rel(None);
    builder.clean(html).to_string()
}

/// Prune the assembled article in place and return its cleaned serialization.
///
/// Headers with negative weight or heavy linking go first, then forms and
/// friends, then the conditional table/ul/div walk. The walk runs in reverse
/// document order so ancestors decide after their descendants have been
/// settled.
pub fn sanitize(article: &NodeRef, candidates: &CandidateMap, min_text_len: usize) -> String {
    let article_sel = Selection::from(article.clone());

    let headers: Vec<NodeRef> = article_sel
        .select("h1, h2, h3, h4, h5, h6")
        .nodes()
        .iter()
        .cloned()
        .collect();
    for header in headers {
        if class_weight(&header) < 0 || link_density(&header) > 0.33 {
            Selection::from(header).remove();
        }
    }

    article_sel.select("form, iframe, textarea").remove();

    let mut allowed: HashSet<NodeId> = HashSet::new();
    let elements: Vec<NodeRef> = article_sel
        .select("table, ul, div")
        .nodes()
        .iter()
        .cloned()
        .collect();

    for el in elements.iter().rev() {
        if allowed.contains(&el.id) {
            continue;
        }
        let el_sel = Selection::from(el.clone());
        let weight = class_weight(el);
        let content_score = candidates
            .get(&el.id)
            .map(|c| c.content_score)
            .unwrap_or(0.0);

        if f64::from(weight) + content_score < 0.0 {
            debug!(
                "cleaned {} with score {:6.3} and weight {}",
                describe(el),
                content_score,
                weight
            );
            el_sel.remove();
            continue;
        }

        if comma_count(&el.text()) >= 10 {
            continue;
        }

        let p_count = el_sel.select("p").length() as i32;
        let img_count = el_sel.select("img").length() as i32;
        // Never count list items as list items for this purpose.
        let li_count = el_sel.select("li").length() as i32 - 100;
        let embed_count = el_sel.select("embed").length() as i32;
        let input_count = el_sel.select("input").length() as i32;

        let content_length = text_length(el);
        let density = link_density(el);
        let tag = tag_name(el);

        let reason = if p_count > 0 && img_count > p_count {
            "too many images"
        } else if li_count > p_count && tag != "ul" && tag != "ol" {
            "more <li>s than <p>s"
        } else if input_count > p_count / 3 {
            "less than 3x <p>s than <input>s"
        } else if content_length < min_text_len && (img_count == 0 || img_count > 2) {
            "too short content without a single image"
        } else if weight < 25 && density > 0.2 {
            "too many links for its weight"
        } else if weight >= 25 && density > 0.5 {
            "too many links for its weight"
        } else if (embed_count == 1 && content_length < 75) || embed_count > 1 {
            "embeds with too short content, or too many embeds"
        } else {
            // Nothing fired. Substantial text on either side rescues this
            // subtree and everything cleanable underneath it.
            let mut sibling_lengths = Vec::new();
            if let Some(length) = first_nonempty_sibling_length(el, Direction::Following) {
                sibling_lengths.push(length);
            }
            if let Some(length) = first_nonempty_sibling_length(el, Direction::Preceding) {
                sibling_lengths.push(length);
            }
            if !sibling_lengths.is_empty()
                && sibling_lengths.iter().sum::<usize>() > RESCUE_SIBLING_LENGTH
            {
                debug!("allowing {}", describe(el));
                allowed.insert(el.id);
                for descendant in el_sel.select("table, ul, div").nodes() {
                    allowed.insert(descendant.id);
                }
            }
            continue;
        };

        debug!(
            "cleaned {:6.3} {} with weight {} cause it has {}",
            content_score,
            describe(el),
            weight,
            reason
        );
        el_sel.remove();
    }

    clean_attributes(&article_sel.html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::scoring::{assemble_siblings, score_paragraphs, select_best};
    use dom_query::Document;

    fn sanitize_page(html: &str) -> String {
        let doc = Document::from(html);
        let (candidates, ordered) = score_paragraphs(&doc, 25);
        let best = select_best(&candidates, &ordered).expect("a best candidate");
        let article = assemble_siblings(&doc, best, &candidates);
        sanitize(&article, &candidates, 25)
    }

    const LONG_P: &str = "A paragraph with plenty of words, commas, clauses, and general substance, giving the extractor something real to keep.";

    #[test]
    fn test_sanitize_drops_negative_weight_headers() {
        let html = format!(
            r#"<html><body><div class="content">
                <h2 class="widget">Promo heading</h2>
                <h2>Real heading</h2>
                <p>{}</p><p>{}</p>
            </div></body></html>"#,
            LONG_P, LONG_P
        );
        let cleaned = sanitize_page(&html);
        assert!(!cleaned.contains("Promo heading"));
        assert!(cleaned.contains("Real heading"));
    }

    #[test]
    fn test_sanitize_drops_forms_and_friends() {
        let html = format!(
            r#"<html><body><div class="content">
                <p>{}</p><p>{}</p>
                <form action="/search"><p>inner form text</p></form>
                <iframe src="http://example.com/embed"></iframe>
                <textarea>comment box</textarea>
            </div></body></html>"#,
            LONG_P, LONG_P
        );
        let cleaned = sanitize_page(&html);
        assert!(!cleaned.contains("<form"));
        assert!(!cleaned.contains("<iframe"));
        assert!(!cleaned.contains("comment box"));
        assert!(cleaned.contains("something real to keep"));
    }

    #[test]
    fn test_sanitize_drops_link_lists() {
        let html = format!(
            r##"<html><body><div class="content">
                <p>{}</p><p>{}</p>
                <div class="boxes"><a href="#">one</a> <a href="#">two</a> <a href="#">three</a> and hardly any text</div>
            </div></body></html>"##,
            LONG_P, LONG_P
        );
        let cleaned = sanitize_page(&html);
        assert!(!cleaned.contains("hardly any text"));
        assert!(cleaned.contains("something real to keep"));
    }

    #[test]
    fn test_sanitize_keeps_wordy_tables() {
        let html = format!(
            r#"<html><body><div class="content">
                <p>{}</p><p>{}</p>
                <table><tr><td>Alpha, beta, gamma, delta, epsilon, zeta, eta, theta, iota, kappa, lambda, and plenty of other rows worth keeping around.</td></tr></table>
            </div></body></html>"#,
            LONG_P, LONG_P
        );
        let cleaned = sanitize_page(&html);
        assert!(cleaned.contains("Alpha, beta, gamma"));
    }

    #[test]
    fn test_sanitize_strips_presentational_attributes() {
        let html = format!(
            r#"<html><body><div class="content">
                <p style="color: red" onclick="alert(1)">{}</p>
                <p>{}</p>
            </div></body></html>"#,
            LONG_P, LONG_P
        );
        let cleaned = sanitize_page(&html);
        assert!(!cleaned.contains("onclick"));
        assert!(!cleaned.contains("style="));
        assert!(cleaned.contains(r#"id="page""#));
    }

    #[test]
    fn test_sanitize_output_is_subtree_of_input() {
        let html = format!(
            r#"<html><body><div class="content"><p>{}</p><p>{}</p></div></body></html>"#,
            LONG_P, LONG_P
        );
        let cleaned = sanitize_page(&html);
        let reparsed = Document::from(cleaned.as_str());
        // Only removals happened: every paragraph in the output already
        // existed in the input.
        for p in reparsed.select("p").iter() {
            assert_eq!(p.text().trim(), LONG_P);
        }
    }
}
