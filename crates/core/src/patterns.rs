//! Pattern configuration loaded from `patterns.json`.
//!
//! The boundary between boilerplate and content is heuristic, so every list
//! here is data: the embedded defaults can be extended at runtime with a
//! [`PatternExtension`] (typically read from the CLI config file).

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

static BUILTIN: LazyLock<Patterns> = LazyLock::new(|| {
	let json = include_str!("../patterns.json");
	serde_json::from_str(json).expect("embedded patterns.json should parse")
});

/// Full pattern set consumed by the filter and the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patterns {
	pub remove: RemovePatterns,
	/// Elements that are never removed, nor any element containing one.
	pub content_roots: Vec<String>,
	/// Structural markers that switch a page to the wiki layout family.
	pub wiki_markers: Vec<String>,
	pub root_selectors: RootSelectors,
	/// Class tokens accepted as a code block language.
	pub known_languages: Vec<String>,
	/// Ordered content-prefix detectors; first match wins.
	pub language_hints: Vec<LanguageHint>,
	/// Tokens that make up "junk" lines (script leftovers such as `undefined`).
	pub junk_text: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovePatterns {
	pub tags: Vec<String>,
	pub selectors: Vec<String>,
	pub roles: Vec<String>,
	pub check_attributes: Vec<String>,
	/// Grouped by family for readability; matching ignores the grouping.
	pub class_tokens: HashMap<String, Vec<String>>,
	pub class_substrings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootSelectors {
	pub wiki: RootSelectorSet,
	pub generic: RootSelectorSet,
}

/// Candidate content roots, tried in order, plus the minimum text length a
/// candidate needs to be accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootSelectorSet {
	pub min_chars: usize,
	pub selectors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageHint {
	/// Case-insensitive regex tested against the first non-blank code line.
	pub pattern: String,
	pub language: String,
}

/// Additions layered on top of the built-in patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternExtension {
	pub remove_tags: Vec<String>,
	pub remove_selectors: Vec<String>,
	pub remove_roles: Vec<String>,
	pub class_tokens: Vec<String>,
	pub class_substrings: Vec<String>,
	pub content_roots: Vec<String>,
	pub wiki_markers: Vec<String>,
	/// Tried before the built-in hints.
	pub language_hints: Vec<LanguageHint>,
	pub junk_text: Vec<String>,
}

impl PatternExtension {
	pub fn is_empty(&self) -> bool {
		*self == PatternExtension::default()
	}
}

impl Patterns {
	/// The embedded default pattern set.
	pub fn builtin() -> &'static Patterns {
		&BUILTIN
	}

	/// Returns a copy of `self` with `extension` merged in.
	pub fn extended(&self, extension: &PatternExtension) -> Patterns {
		let mut patterns = self.clone();
		patterns.remove.tags.extend(extension.remove_tags.iter().map(|t| t.to_ascii_lowercase()));
		patterns.remove.selectors.extend(extension.remove_selectors.iter().cloned());
		patterns.remove.roles.extend(extension.remove_roles.iter().cloned());
		patterns
			.remove
			.class_tokens
			.entry("custom".to_string())
			.or_default()
			.extend(extension.class_tokens.iter().map(|t| t.to_ascii_lowercase()));
		patterns
			.remove
			.class_substrings
			.extend(extension.class_substrings.iter().map(|s| s.to_ascii_lowercase()));
		patterns.content_roots.extend(extension.content_roots.iter().cloned());
		patterns.wiki_markers.extend(extension.wiki_markers.iter().cloned());

		let mut hints = extension.language_hints.clone();
		hints.append(&mut patterns.language_hints);
		patterns.language_hints = hints;

		patterns.junk_text.extend(extension.junk_text.iter().cloned());
		patterns
	}

	/// Every class token across all families.
	pub(crate) fn all_class_tokens(&self) -> impl Iterator<Item = &str> {
		self.remove.class_tokens.values().flatten().map(String::as_str)
	}
}

impl Default for Patterns {
	fn default() -> Self {
		Patterns::builtin().clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_patterns_load() {
		let patterns = Patterns::builtin();
		assert!(patterns.remove.tags.iter().any(|t| t == "nav"));
		assert!(!patterns.remove.selectors.is_empty());
		assert!(patterns.all_class_tokens().any(|t| t == "cookie"));
		assert!(!patterns.wiki_markers.is_empty());
		assert!(patterns.root_selectors.generic.min_chars > patterns.root_selectors.wiki.min_chars);
		assert!(!patterns.junk_text.is_empty());
	}

	#[test]
	fn extension_prepends_language_hints() {
		let extension = PatternExtension {
			language_hints: vec![LanguageHint {
				pattern: "^fn ".into(),
				language: "rust".into(),
			}],
			class_tokens: vec!["Promo".into()],
			..Default::default()
		};
		let patterns = Patterns::builtin().extended(&extension);
		assert_eq!(patterns.language_hints[0].language, "rust");
		assert_eq!(patterns.language_hints.len(), Patterns::builtin().language_hints.len() + 1);
		assert!(patterns.all_class_tokens().any(|t| t == "promo"));
	}

	#[test]
	fn extension_deserializes_camel_case_with_defaults() {
		let extension: PatternExtension = serde_json::from_str(r#"{"removeSelectors": [".promo-strip"]}"#).unwrap();
		assert_eq!(extension.remove_selectors, vec![".promo-strip".to_string()]);
		assert!(extension.class_tokens.is_empty());
		assert!(!extension.is_empty());
		assert!(PatternExtension::default().is_empty());
	}
}
