// ABOUTME: Structural normalization passes that run before paragraph scoring.
// ABOUTME: Strips unlikely candidates, renames inline-only divs to p, splits double-br runs.

use dom_query::{Document, NodeRef, Selection};
use log::debug;

use crate::dom::text::{attr_or_empty, describe, tag_name};
use crate::regexes::{DIV_TO_P_RE, MAYBE_RE, UNLIKELY_RE};

/// Detach every element whose class/id mark it as chrome (comments, sidebars,
/// footers) unless the same string also looks like article scaffolding.
/// Runs only in the ruthless phase.
pub fn remove_unlikely_candidates(doc: &Document) {
    let nodes: Vec<NodeRef> = doc.select("*").nodes().iter().cloned().collect();
    for node in nodes {
        let class = attr_or_empty(&node, "class");
        let id = attr_or_empty(&node, "id");
        if class.is_empty() && id.is_empty() {
            continue;
        }
        let combo = format!("{} {}", class, id);
        if UNLIKELY_RE.is_match(&combo)
            && !MAYBE_RE.is_match(&combo)
            && tag_name(&node) != "body"
            && node.parent().is_some()
        {
            debug!("removing unlikely candidate - {}", describe(&node));
            Selection::from(node).remove();
        }
    }
}

/// Rename divs that contain no block-level markup to paragraphs so the
/// scoring pass can count their text.
pub fn transform_misused_divs_into_paragraphs(doc: &Document) {
    let nodes: Vec<NodeRef> = doc.select("div").nodes().iter().cloned().collect();
    for node in nodes {
        let sel = Selection::from(node.clone());
        if !DIV_TO_P_RE.is_match(&sel.inner_html()) {
            debug!("altering {} to p", describe(&node));
            sel.rename("p");
        }
    }
}

/// A div's content flattened into a linear stream: interleaved text broken
/// out on its own, each child element carried as its serialized form.
enum Part {
    Text(String),
    Elem { tag: String, html: String },
}

impl Part {
    fn is_whitespace_text(&self) -> bool {
        matches!(self, Part::Text(text) if text.trim().is_empty())
    }

    fn is_br(&self) -> bool {
        matches!(self, Part::Elem { tag, .. } if tag == "br")
    }

    fn is_block(&self) -> bool {
        const BLOCK_TAGS: &[&str] = &[
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "blockquote",
            "div",
            "img",
            "p",
            "pre",
            "table",
        ];
        matches!(self, Part::Elem { tag, .. } if BLOCK_TAGS.contains(&tag.as_str()))
    }
}

fn split_into_parts(node: &NodeRef) -> Vec<Part> {
    let mut parts = Vec::new();
    for child in node.children_it(false) {
        if child.is_text() {
            parts.push(Part::Text(child.text().to_string()));
        } else if child.is_element() {
            parts.push(Part::Elem {
                tag: tag_name(&child),
                html: Selection::from(child.clone()).html().to_string(),
            });
        }
    }
    parts
}

/// Drop whitespace-only runs sitting between two breaks so `<br> \n <br>`
/// reads as a double break.
fn squeeze_breaks(parts: Vec<Part>) -> Vec<Part> {
    let breaks: Vec<usize> = parts
        .iter()
        .enumerate()
        .filter(|(_, part)| part.is_br())
        .map(|(i, _)| i)
        .collect();

    let mut marked = vec![false; parts.len()];
    for pair in breaks.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if parts[left + 1..right].iter().all(Part::is_whitespace_text) {
            for slot in &mut marked[left + 1..right] {
                *slot = true;
            }
        }
    }

    parts
        .into_iter()
        .zip(marked)
        .filter(|(_, marked)| !*marked)
        .map(|(part, _)| part)
        .collect()
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn push_part(out: &mut String, part: Part) {
    match part {
        Part::Text(text) => out.push_str(&escape_text(&text)),
        Part::Elem { html, .. } => out.push_str(&html),
    }
}

/// Wrap the accumulated parts in a `<p>` unless they are empty or pure
/// whitespace. Returns whether a paragraph was emitted.
fn flush_paragraph(acc: &mut Vec<Part>, out: &mut String) -> bool {
    if acc.iter().all(Part::is_whitespace_text) {
        acc.clear();
        return false;
    }
    out.push_str("<p>");
    for part in acc.drain(..) {
        push_part(out, part);
    }
    out.push_str("</p>");
    true
}

/// Walk the part sequence as a two-state machine, rebuilding the div's inner
/// HTML with double-break runs turned into paragraph boundaries and loose
/// inline content wrapped. Returns the rebuilt HTML and whether it differs
/// structurally from the input.
fn rebuild_parts(parts: Vec<Part>) -> (String, bool) {
    enum State {
        Start,
        // Holds the break we saw while we look one part ahead.
        Br(Part),
    }

    let mut out = String::new();
    let mut acc: Vec<Part> = Vec::new();
    let mut changed = false;
    let mut state = State::Start;

    for part in parts {
        state = match state {
            State::Start => {
                if part.is_br() {
                    State::Br(part)
                } else if part.is_block() {
                    changed |= flush_paragraph(&mut acc, &mut out);
                    push_part(&mut out, part);
                    State::Start
                } else {
                    acc.push(part);
                    State::Start
                }
            }
            State::Br(first_br) => {
                if part.is_br() {
                    // A double break: both breaks vanish and whatever was
                    // accumulated becomes its own paragraph.
                    flush_paragraph(&mut acc, &mut out);
                    changed = true;
                } else if part.is_block() {
                    acc.push(first_br);
                    changed |= flush_paragraph(&mut acc, &mut out);
                    push_part(&mut out, part);
                } else {
                    acc.push(first_br);
                    acc.push(part);
                }
                State::Start
            }
        };
    }

    if let State::Br(first_br) = state {
        acc.push(first_br);
    }
    changed |= flush_paragraph(&mut acc, &mut out);

    (out, changed)
}

/// Split double-`<br>` runs inside divs into real paragraphs, wrapping loose
/// inline content so the scoring pass can see it. Divs are visited deepest
/// first; a rebuilt ancestor then serializes already-transformed children.
pub fn transform_double_breaks_into_paragraphs(doc: &Document) {
    let nodes: Vec<NodeRef> = doc.select("div").nodes().iter().cloned().collect();
    for node in nodes.iter().rev() {
        let parts = split_into_parts(node);
        if parts.is_empty() {
            continue;
        }
        let before = parts.len();
        let parts = squeeze_breaks(parts);
        let squeezed = parts.len() != before;

        let (rebuilt, changed) = rebuild_parts(parts);
        if changed || squeezed {
            Selection::from(node.clone()).set_html(rebuilt.as_str());
        }
    }
}
