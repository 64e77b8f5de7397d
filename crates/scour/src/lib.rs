// ABOUTME: Main library entry point for the scour article extractor.
// ABOUTME: Re-exports the public API: Document, DocumentBuilder, Summary, errors, and fetchers.

//! Scour - extracts the primary readable article from server-rendered HTML.
//!
//! The extractor scores block elements by text volume, comma density, link
//! density, and class/id hints, assembles the best candidate together with
//! its qualifying siblings, prunes what came along for the ride, and
//! optionally follows next-page links to stitch multi-page articles into one
//! fragment.
//!
//! # Example
//!
//! ```
//! use scour::Document;
//!
//! let html = r#"
//!     <html><body><div class="story">
//!         <p>The first paragraph of the story, with commas, details, and
//!         enough words to be taken seriously by the scorer.</p>
//!         <p>The second paragraph continues the story, adding context,
//!         quotes, and still more words for good measure.</p>
//!     </div></body></html>
//! "#;
//!
//! let summary = Document::new(html).summary()?;
//! if let Some(article) = summary.html {
//!     println!("{:.1}: {}", summary.confidence, article);
//! }
//! # Ok::<(), scour::ExtractError>(())
//! ```

pub mod document;
pub mod dom;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod htmls;
pub mod options;
pub mod paging;
pub mod regexes;

pub use crate::document::Document;
pub use crate::error::{ErrorCode, ExtractError};
pub use crate::extract::Summary;
pub use crate::fetch::{Fetcher, HttpFetcher};
pub use crate::options::{DocumentBuilder, Options};
