//! Markup documents flowing into and out of the boilerplate filter.

use scraper::{Html, Node};

use crate::error::{ExtractionError, Result};

/// Markup exactly as fetched, plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
	markup: String,
	url: Option<String>,
}

impl RawDocument {
	pub fn new(markup: impl Into<String>, url: Option<String>) -> Self {
		Self { markup: markup.into(), url }
	}

	/// Decodes `bytes` as UTF-8 (a leading BOM is skipped).
	pub fn from_bytes(bytes: &[u8], url: Option<String>) -> Result<Self> {
		let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
		let markup = std::str::from_utf8(bytes).map_err(|e| ExtractionError::InvalidEncoding(e.to_string()))?;
		Ok(Self::new(markup, url))
	}

	pub fn markup(&self) -> &str {
		&self.markup
	}

	pub fn url(&self) -> Option<&str> {
		self.url.as_deref()
	}

	/// Concatenated text nodes of the parsed markup.
	pub fn text_content(&self) -> String {
		text_content(&self.markup)
	}

	/// Rejects payloads that are clearly not markup.
	pub(crate) fn ensure_markup(&self) -> Result<()> {
		if self.markup.contains('\0') {
			return Err(ExtractionError::Unparseable("input contains NUL bytes".into()));
		}

		let total = self.markup.chars().count();
		let control = self
			.markup
			.chars()
			.filter(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\x0c'))
			.count();
		if total > 0 && control * 10 > total {
			return Err(ExtractionError::Unparseable(format!(
				"{control} of {total} characters are control characters"
			)));
		}

		Ok(())
	}
}

/// Markup with boilerplate subtrees removed.
///
/// Only the filter creates these, so the text is always a subsequence of the
/// originating [`RawDocument`]'s text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedDocument {
	markup: String,
	url: Option<String>,
}

impl CleanedDocument {
	pub(crate) fn new(markup: String, url: Option<String>) -> Self {
		Self { markup, url }
	}

	pub fn markup(&self) -> &str {
		&self.markup
	}

	pub fn url(&self) -> Option<&str> {
		self.url.as_deref()
	}

	/// Concatenated text nodes of the parsed markup.
	pub fn text_content(&self) -> String {
		text_content(&self.markup)
	}
}

fn text_content(markup: &str) -> String {
	let html = Html::parse_document(markup);
	html.tree
		.root()
		.descendants()
		.filter_map(|node| match node.value() {
			Node::Text(text) => Some(&**text),
			_ => None,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_bytes_skips_bom() {
		let doc = RawDocument::from_bytes(b"\xEF\xBB\xBF<p>hi</p>", None).unwrap();
		assert_eq!(doc.markup(), "<p>hi</p>");
	}

	#[test]
	fn from_bytes_rejects_invalid_utf8() {
		let err = RawDocument::from_bytes(&[0x3c, 0xff, 0xfe, 0x3e], None).unwrap_err();
		assert!(matches!(err, ExtractionError::InvalidEncoding(_)));
	}

	#[test]
	fn binary_payloads_are_unparseable() {
		let doc = RawDocument::new("PK\u{3}\u{4}\0\0binary", None);
		assert!(matches!(doc.ensure_markup(), Err(ExtractionError::Unparseable(_))));
	}

	#[test]
	fn empty_markup_is_acceptable() {
		assert!(RawDocument::new("", None).ensure_markup().is_ok());
	}

	#[test]
	fn text_content_concatenates_text_nodes() {
		let doc = RawDocument::new("<div>Hello <b>big</b> world</div>", None);
		assert_eq!(doc.text_content(), "Hello big world");
	}
}
