//! webtotext: readable text out of rendered web pages.
//!
//! The pipeline takes the markup of a page and runs three pure stages over it:
//!
//! 1. [`BoilerplateFilter`] removes navigation, ads, consent banners and other
//!    page chrome as whole subtrees.
//! 2. [`Extractor`] classifies the page layout and walks the content root,
//!    producing an ordered list of [`ContentBlock`]s.
//! 3. [`format`] renders the blocks as plain text or markdown.
//!
//! [`Pipeline`] wires the stages together and adds page metadata; [`extract`]
//! is the one-call entry point with the built-in patterns.
//!
//! ```ignore
//! use webtotext::{FormatMode, extract};
//!
//! let out = extract("<main><h1>Hi</h1><p>There</p></main>", FormatMode::Markdown)?;
//! assert_eq!(out.text, "# Hi\n\nThere\n");
//! ```

pub mod block;
pub mod document;
pub mod error;
pub mod extract;
pub mod filter;
pub mod format;
mod junk;
pub mod metadata;
pub mod patterns;
pub mod pipeline;

pub use block::{ContentBlock, PanelKind};
pub use document::{CleanedDocument, RawDocument};
pub use error::{ExtractionError, Result};
pub use extract::{Extractor, LayoutFamily};
pub use filter::BoilerplateFilter;
pub use format::{FormatMode, FormattedOutput, format};
pub use metadata::{PageMetadata, extract_domain};
pub use patterns::{LanguageHint, PatternExtension, Patterns};
pub use pipeline::{ExtractOptions, Extraction, Pipeline, extract};
