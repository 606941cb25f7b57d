//! Structure-aware extraction: cleaned markup to ordered content blocks.
//!
//! A document is classified once into a [`LayoutFamily`]. The walk then
//! visits the chosen content root in document order and tries each element
//! against the family's rule table followed by the generic table. Elements no
//! rule claims are containers; their inline text is gathered into runs that
//! become paragraphs.

mod language;
mod rules;
mod text;
mod wiki;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::block::ContentBlock;
use crate::document::CleanedDocument;
use crate::error::Result;
use crate::filter::{compile_selector, compile_selector_list};
use crate::junk::{self, JunkFilter};
use crate::patterns::{Patterns, RootSelectorSet};

pub(crate) use language::LanguageDetector;
use rules::{GENERIC_RULES, Placement, Rule};
use text::Gather;

/// Page layout family, chosen once per document from structural markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutFamily {
	Generic,
	Wiki,
}

impl LayoutFamily {
	/// The family's dedicated rules followed by the generic ones.
	fn rules(self) -> impl Iterator<Item = &'static Rule> {
		let dedicated: &'static [Rule] = match self {
			LayoutFamily::Wiki => wiki::WIKI_RULES,
			LayoutFamily::Generic => &[],
		};
		dedicated.iter().chain(GENERIC_RULES)
	}
}

#[derive(Debug, Clone)]
struct RootCandidates {
	selectors: Vec<Selector>,
	min_chars: usize,
}

impl RootCandidates {
	fn new(set: &RootSelectorSet) -> Result<Self> {
		Ok(Self {
			selectors: set.selectors.iter().map(|s| compile_selector(s)).collect::<Result<_>>()?,
			min_chars: set.min_chars,
		})
	}
}

/// Compiled extraction rules and patterns.
#[derive(Debug, Clone)]
pub struct Extractor {
	wiki_markers: Option<Selector>,
	wiki_roots: RootCandidates,
	generic_roots: RootCandidates,
	languages: LanguageDetector,
	junk: JunkFilter,
}

impl Extractor {
	pub fn new(patterns: &Patterns) -> Result<Self> {
		Ok(Self {
			wiki_markers: compile_selector_list(&patterns.wiki_markers)?,
			wiki_roots: RootCandidates::new(&patterns.root_selectors.wiki)?,
			generic_roots: RootCandidates::new(&patterns.root_selectors.generic)?,
			languages: LanguageDetector::new(patterns)?,
			junk: JunkFilter::new(&patterns.junk_text),
		})
	}

	/// `Wiki` when any structural marker is present.
	pub fn classify(&self, html: &Html) -> LayoutFamily {
		match &self.wiki_markers {
			Some(markers) if html.select(markers).next().is_some() => LayoutFamily::Wiki,
			_ => LayoutFamily::Generic,
		}
	}

	/// Content blocks of `document` in reading order.
	pub fn extract(&self, document: &CleanedDocument) -> Vec<ContentBlock> {
		let html = Html::parse_document(document.markup());
		let family = self.classify(&html);
		self.extract_html(&html, family)
	}

	pub(crate) fn extract_html(&self, html: &Html, family: LayoutFamily) -> Vec<ContentBlock> {
		let root = self.content_root(html, family);
		let mut walk = Walk::new(self, family, 0);
		walk.walk_children(root);
		let blocks = walk.finish();
		debug!(?family, root = root.value().name(), blocks = blocks.len(), "extracted content blocks");
		blocks
	}

	/// First root candidate with enough text, trying the family's own
	/// candidates before the other family's. Falls back to `body`, then the
	/// document element.
	fn content_root<'a>(&self, html: &'a Html, family: LayoutFamily) -> ElementRef<'a> {
		let order = match family {
			LayoutFamily::Wiki => [&self.wiki_roots, &self.generic_roots],
			LayoutFamily::Generic => [&self.generic_roots, &self.wiki_roots],
		};

		for candidates in order {
			for selector in &candidates.selectors {
				if let Some(element) = html.select(selector).next() {
					let chars: usize = element.text().map(|t| t.trim().chars().count()).sum();
					if chars > candidates.min_chars {
						return element;
					}
					trace!(chars, "content root candidate too short");
				}
			}
		}

		let document = html.root_element();
		document
			.children()
			.filter_map(ElementRef::wrap)
			.find(|e| e.value().name() == "body")
			.unwrap_or(document)
	}
}

impl Default for Extractor {
	fn default() -> Self {
		Self::new(Patterns::builtin()).expect("built-in patterns should compile")
	}
}

/// Containers nested deeper than this are flattened into the current inline
/// run instead of walked.
const MAX_WALK_DEPTH: usize = 256;

/// State of one pass over a subtree.
pub(crate) struct Walk<'a> {
	extractor: &'a Extractor,
	family: LayoutFamily,
	blocks: Vec<ContentBlock>,
	inline: String,
	depth: usize,
}

impl<'a> Walk<'a> {
	fn new(extractor: &'a Extractor, family: LayoutFamily, depth: usize) -> Self {
		Self {
			extractor,
			family,
			blocks: Vec::new(),
			inline: String::new(),
			depth,
		}
	}

	pub(crate) fn family(&self) -> LayoutFamily {
		self.family
	}

	pub(crate) fn languages(&self) -> &'a LanguageDetector {
		&self.extractor.languages
	}

	pub(crate) fn gather(&self) -> Gather {
		Gather {
			wiki: self.family == LayoutFamily::Wiki,
			..Gather::default()
		}
	}

	pub(crate) fn push(&mut self, block: ContentBlock) {
		trace!(kind = block.kind_name(), "block");
		self.blocks.push(block);
	}

	pub(crate) fn push_inline(&mut self, text: &str) {
		self.inline.push(' ');
		self.inline.push_str(text);
		self.inline.push(' ');
	}

	pub(crate) fn walk_children(&mut self, element: ElementRef<'_>) {
		if self.depth >= MAX_WALK_DEPTH {
			trace!(tag = element.value().name(), "nesting too deep, flattening");
			let gather = self.gather();
			text::gather_into(element, &mut self.inline, gather);
			return;
		}

		self.depth += 1;
		for child in element.children() {
			if let Some(text) = child.value().as_text() {
				self.inline.push_str(text);
			} else if let Some(child) = ElementRef::wrap(child) {
				self.visit(child);
			}
		}
		self.depth -= 1;
	}

	fn visit(&mut self, element: ElementRef<'_>) {
		if let Some(rule) = self.family.rules().find(|rule| (rule.matches)(&element)) {
			trace!(rule = rule.name, tag = element.value().name(), "rule matched");
			if rule.placement == Placement::Block {
				self.flush();
			}
			(rule.build)(element, self);
			return;
		}

		match element.value().name() {
			"br" => self.inline.push('\n'),
			"script" | "style" | "template" | "noscript" => {}
			name if text::is_inline(name) => {
				let gather = self.gather();
				text::gather_into(element, &mut self.inline, gather);
			}
			_ => {
				self.flush();
				self.walk_children(element);
				self.flush();
			}
		}
	}

	/// Ends the current inline run, emitting a paragraph when it carries
	/// real content.
	pub(crate) fn flush(&mut self) {
		if self.inline.is_empty() {
			return;
		}
		let raw = std::mem::take(&mut self.inline);
		if let Some(text) = self.paragraph_text(&raw) {
			self.push(ContentBlock::paragraph(text));
		}
	}

	fn paragraph_text(&self, raw: &str) -> Option<String> {
		let stripped = junk::strip_macro_remnants(raw);
		let lines: Vec<String> = text::normalize_lines(&stripped)
			.into_iter()
			.filter(|line| !self.extractor.junk.is_junk_line(line))
			.collect();
		let text = junk::bracket_issue_refs(&lines.join("\n"));
		text.chars().any(char::is_alphanumeric).then_some(text)
	}

	/// Single-line text for headings, list items and table cells. `None`
	/// when nothing but whitespace or junk remains.
	pub(crate) fn single_line(&self, raw: &str) -> Option<String> {
		let text = text::collapse_whitespace(&junk::strip_macro_remnants(raw));
		if text.is_empty() || self.extractor.junk.is_junk_line(&text) {
			return None;
		}
		Some(text)
	}

	/// Blocks found below `element` by a separate walk.
	pub(crate) fn sub_blocks(&self, element: ElementRef<'_>) -> Vec<ContentBlock> {
		let mut walk = Walk::new(self.extractor, self.family, self.depth);
		walk.walk_children(element);
		walk.finish()
	}

	fn finish(mut self) -> Vec<ContentBlock> {
		self.flush();
		self.blocks
	}
}
