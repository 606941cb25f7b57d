//! Boilerplate removal.
//!
//! The filter parses the raw markup once, marks whole subtrees that match the
//! removal patterns and detaches them. Nothing is rewritten or inserted, so
//! the cleaned text is always a subsequence of the raw text.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::document::{CleanedDocument, RawDocument};
use crate::error::{ExtractionError, Result};
use crate::patterns::Patterns;

/// Elements the filter never touches.
const STRUCTURAL: &[&str] = &["html", "head", "body"];

/// Tags removed only outside a content root (an `<article>` may carry its own
/// `<header>` with the headline).
const SCOPED_TAGS: &[&str] = &["header"];

/// Compiled removal patterns.
#[derive(Debug, Clone)]
pub struct BoilerplateFilter {
	remove: Option<Selector>,
	scoped: Option<Selector>,
	content_roots: Option<Selector>,
	/// Content roots plus the extractor's root candidates of both families.
	protected: Option<Selector>,
	check_attributes: Vec<String>,
	class_tokens: HashSet<String>,
	class_substrings: Vec<String>,
}

impl BoilerplateFilter {
	/// Compiles `patterns`, failing on the first selector that does not parse.
	pub fn new(patterns: &Patterns) -> Result<Self> {
		let (scoped_tags, tags): (Vec<&String>, Vec<&String>) =
			patterns.remove.tags.iter().partition(|t| SCOPED_TAGS.contains(&t.as_str()));

		let mut remove: Vec<String> = tags.into_iter().cloned().collect();
		remove.extend(patterns.remove.selectors.iter().cloned());
		remove.extend(patterns.remove.roles.iter().map(|role| format!("[role~=\"{role}\"]")));

		let scoped: Vec<String> = scoped_tags.into_iter().cloned().collect();

		let mut protected = patterns.content_roots.clone();
		protected.extend(patterns.root_selectors.wiki.selectors.iter().cloned());
		protected.extend(patterns.root_selectors.generic.selectors.iter().cloned());

		Ok(Self {
			remove: compile_selector_list(&remove)?,
			scoped: compile_selector_list(&scoped)?,
			content_roots: compile_selector_list(&patterns.content_roots)?,
			protected: compile_selector_list(&protected)?,
			check_attributes: patterns.remove.check_attributes.clone(),
			class_tokens: patterns.all_class_tokens().map(str::to_ascii_lowercase).collect(),
			class_substrings: patterns.remove.class_substrings.iter().map(|s| s.to_ascii_lowercase()).collect(),
		})
	}

	/// Removes boilerplate subtrees from `raw`.
	///
	/// Zero matches returns the markup unchanged. Only non-markup input is an
	/// error.
	pub fn clean(&self, raw: &RawDocument) -> Result<CleanedDocument> {
		raw.ensure_markup()?;

		let mut html = Html::parse_document(raw.markup());
		let removed = self.remove_boilerplate(&mut html);
		if removed == 0 {
			debug!("boilerplate filter matched nothing");
			return Ok(CleanedDocument::new(raw.markup().to_string(), raw.url().map(String::from)));
		}

		debug!(removed, "boilerplate filter removed subtrees");
		Ok(CleanedDocument::new(html.html(), raw.url().map(String::from)))
	}

	/// Detaches the topmost boilerplate elements and returns how many were
	/// removed. Descendants of a removed subtree are not visited.
	fn remove_boilerplate(&self, html: &mut Html) -> usize {
		let mut doomed = Vec::new();
		let mut stack = vec![(html.root_element(), false)];

		while let Some((element, inside_root)) = stack.pop() {
			for child in element.children().filter_map(ElementRef::wrap) {
				let is_root = matches(&self.content_roots, &child);
				let inside_root = inside_root || is_root;

				if !is_root && !STRUCTURAL.contains(&child.value().name()) && self.is_boilerplate(&child, inside_root) && !self.protects_root(&child) {
					debug!(tag = child.value().name(), "boilerplate element");
					doomed.push(child.id());
					continue;
				}
				stack.push((child, inside_root));
			}
		}

		let removed = doomed.len();
		for id in doomed {
			if let Some(mut node) = html.tree.get_mut(id) {
				node.detach();
			}
		}
		removed
	}

	fn is_boilerplate(&self, element: &ElementRef<'_>, inside_root: bool) -> bool {
		if matches(&self.remove, element) {
			return true;
		}
		if !inside_root && matches(&self.scoped, element) {
			return true;
		}
		self.check_attributes
			.iter()
			.filter_map(|name| element.value().attr(name))
			.any(|value| self.attribute_hits(value))
	}

	fn attribute_hits(&self, value: &str) -> bool {
		let value = value.to_ascii_lowercase();
		if self.class_substrings.iter().any(|s| value.contains(s.as_str())) {
			return true;
		}
		value
			.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
			.any(|token| self.class_tokens.contains(token))
	}

	/// Whether `element` is or holds something the extractor may pick as its
	/// content root.
	fn protects_root(&self, element: &ElementRef<'_>) -> bool {
		match &self.protected {
			Some(selector) => selector.matches(element) || element.select(selector).next().is_some(),
			None => false,
		}
	}
}

impl Default for BoilerplateFilter {
	fn default() -> Self {
		Self::new(Patterns::builtin()).expect("built-in patterns should compile")
	}
}

fn matches(selector: &Option<Selector>, element: &ElementRef<'_>) -> bool {
	selector.as_ref().is_some_and(|s| s.matches(element))
}

/// Validates each selector on its own (so the error names the culprit) and
/// joins them into one selector group.
pub(crate) fn compile_selector_list(patterns: &[String]) -> Result<Option<Selector>> {
	if patterns.is_empty() {
		return Ok(None);
	}
	for pattern in patterns {
		compile_selector(pattern)?;
	}
	compile_selector(&patterns.join(", ")).map(Some)
}

pub(crate) fn compile_selector(pattern: &str) -> Result<Selector> {
	Selector::parse(pattern).map_err(|e| ExtractionError::pattern(pattern, format!("{e:?}")))
}
