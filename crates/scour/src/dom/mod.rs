// ABOUTME: DOM pipeline stages for article extraction.
// ABOUTME: Text helpers, structural normalizers, paragraph scoring, and conditional cleaning.

//! DOM-level passes of the extraction pipeline.
//!
//! The stages run in order over one parsed document: normalization rewrites
//! structure so the scorer can see paragraphs, scoring picks the best
//! candidate and assembles its siblings, and the cleaners prune what the
//! assembly dragged along.

pub mod cleaners;
pub mod normalize;
pub mod scoring;
pub mod text;
