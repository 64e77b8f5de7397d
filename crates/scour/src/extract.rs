// ABOUTME: The ruthless/lenient extraction loop and the Summary result type.
// ABOUTME: Runs normalization, scoring, sibling assembly, and sanitation over a fresh parse per attempt.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dom::cleaners::sanitize;
use crate::dom::normalize::{
    remove_unlikely_candidates, transform_double_breaks_into_paragraphs,
    transform_misused_divs_into_paragraphs,
};
use crate::dom::scoring::{assemble_siblings, score_paragraphs, select_best};
use crate::htmls;

/// The outcome of an extraction: the winning candidate's score and the
/// cleaned article fragment.
///
/// `html` of `None` means no article could be found at all. A confidence
/// below [`Summary::LOW_CONFIDENCE`] means the extractor did its best but the
/// result may not be the story.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub confidence: f64,
    pub html: Option<String>,
}

impl Summary {
    pub const LOW_CONFIDENCE: f64 = 35.0;

    pub(crate) fn none() -> Self {
        Self {
            confidence: 0.0,
            html: None,
        }
    }

    /// True when extraction failed or the score is too weak to trust.
    pub fn is_low_confidence(&self) -> bool {
        self.html.is_none() || self.confidence < Self::LOW_CONFIDENCE
    }
}

/// Extract the article fragment from one page of HTML.
///
/// The first pass is ruthless: elements whose class/id look like chrome are
/// stripped before anything is scored. When that leaves no candidates, or
/// the cleaned output comes up shorter than `retry_length`, the input is
/// re-parsed pristine and the pass runs again leniently.
pub fn extract(
    html: &str,
    url: Option<&str>,
    min_text_length: usize,
    retry_length: usize,
) -> Summary {
    let mut ruthless = true;
    loop {
        let doc = htmls::parse(html, url);

        doc.select("script, style").remove();
        for body in doc.select("body").iter() {
            body.set_attr("id", "readabilityBody");
        }

        if ruthless {
            remove_unlikely_candidates(&doc);
        }
        transform_double_breaks_into_paragraphs(&doc);
        transform_misused_divs_into_paragraphs(&doc);

        let (candidates, ordered) = score_paragraphs(&doc, min_text_length);
        let Some(best) = select_best(&candidates, &ordered) else {
            if ruthless {
                debug!("ruthless removal left no candidates, retrying leniently");
                ruthless = false;
                continue;
            }
            debug!("ruthless and lenient parsing both failed");
            return Summary::none();
        };

        let confidence = best.content_score;
        let article = assemble_siblings(&doc, best, &candidates);
        let cleaned = sanitize(&article, &candidates, min_text_length);

        if ruthless && cleaned.chars().count() < retry_length {
            debug!(
                "cleaned article too short ({} chars), retrying leniently",
                cleaned.chars().count()
            );
            ruthless = false;
            continue;
        }

        return Summary {
            confidence,
            html: Some(cleaned),
        };
    }
}
