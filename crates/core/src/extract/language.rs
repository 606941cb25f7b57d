//! Code block language hints.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use scraper::ElementRef;

use crate::error::{ExtractionError, Result};
use crate::patterns::Patterns;

static BRUSH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)brush:\s*([\w#+-]+)").expect("BRUSH_RE should compile"));

const CLASS_PREFIXES: &[&str] = &["language-", "lang-", "highlight-source-", "brush:"];
const DATA_ATTRIBUTES: &[&str] = &["data-language", "data-lang"];

/// Finds a code block's language from markup hints, falling back to the
/// ordered content-prefix detectors.
#[derive(Debug, Clone)]
pub(crate) struct LanguageDetector {
	known: HashSet<String>,
	hints: Vec<(Regex, String)>,
}

impl LanguageDetector {
	pub(crate) fn new(patterns: &Patterns) -> Result<Self> {
		let hints = patterns
			.language_hints
			.iter()
			.map(|hint| {
				Regex::new(&format!("(?i){}", hint.pattern))
					.map(|re| (re, hint.language.clone()))
					.map_err(|e| ExtractionError::pattern(&hint.pattern, e.to_string()))
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(Self {
			known: patterns.known_languages.iter().map(|l| l.to_ascii_lowercase()).collect(),
			hints,
		})
	}

	pub(crate) fn detect(&self, element: ElementRef<'_>, code: &str) -> Option<String> {
		self.from_markup(element).or_else(|| self.from_content(code))
	}

	/// Looks at the element, its inner `pre`/`code` elements and its closest
	/// ancestors, in that order.
	pub(crate) fn from_markup(&self, element: ElementRef<'_>) -> Option<String> {
		let inner = element
			.descendants()
			.skip(1)
			.filter_map(ElementRef::wrap)
			.filter(|e| matches!(e.value().name(), "pre" | "code"))
			.take(4);
		let outer = element.ancestors().filter_map(ElementRef::wrap).take(3);

		std::iter::once(element).chain(inner).chain(outer).find_map(|e| self.from_attributes(&e))
	}

	fn from_attributes(&self, element: &ElementRef<'_>) -> Option<String> {
		let value = element.value();

		for name in DATA_ATTRIBUTES {
			if let Some(lang) = value.attr(name).map(str::trim).filter(|l| !l.is_empty()) {
				return Some(lang.to_ascii_lowercase());
			}
		}

		for attr in [value.attr("data-syntaxhighlighter-params"), value.attr("class")].into_iter().flatten() {
			if let Some(caps) = BRUSH_RE.captures(attr) {
				if let Some(m) = caps.get(1) {
					return Some(m.as_str().to_ascii_lowercase());
				}
			}
		}

		for class in value.classes() {
			let class = class.to_ascii_lowercase();
			for prefix in CLASS_PREFIXES {
				if let Some(lang) = class.strip_prefix(prefix).filter(|l| !l.is_empty()) {
					return Some(lang.to_string());
				}
			}
			if self.known.contains(&class) {
				return Some(class);
			}
		}

		None
	}

	/// Runs the detectors against the first non-blank line.
	pub(crate) fn from_content(&self, code: &str) -> Option<String> {
		let line = code.lines().map(str::trim).find(|l| !l.is_empty())?;
		self.hints.iter().find(|(re, _)| re.is_match(line)).map(|(_, lang)| lang.clone())
	}
}

#[cfg(test)]
mod tests {
	use scraper::{Html, Selector};

	use super::*;

	fn detector() -> LanguageDetector {
		LanguageDetector::new(Patterns::builtin()).unwrap()
	}

	fn detect_in(markup: &str) -> Option<String> {
		let html = Html::parse_fragment(markup);
		let pre = html.select(&Selector::parse("pre").unwrap()).next().unwrap();
		detector().from_markup(pre)
	}

	#[test]
	fn reads_class_and_attribute_hints() {
		assert_eq!(detect_in("<pre><code class='language-rust'>fn x() {}</code></pre>"), Some("rust".into()));
		assert_eq!(detect_in("<pre class='lang-go'>x</pre>"), Some("go".into()));
		assert_eq!(detect_in("<pre data-syntaxhighlighter-params='brush: java; gutter: false'>x</pre>"), Some("java".into()));
		assert_eq!(detect_in("<div class='highlight-source-python'><pre>x</pre></div>"), Some("python".into()));
		assert_eq!(detect_in("<pre data-lang='SQL'>x</pre>"), Some("sql".into()));
		assert_eq!(detect_in("<pre class='kotlin'>x</pre>"), Some("kotlin".into()));
		assert_eq!(detect_in("<pre>x</pre>"), None);
	}

	#[test]
	fn content_detectors_apply_in_order() {
		let detector = detector();
		assert_eq!(detector.from_content("#include <stdio.h>"), Some("cpp".into()));
		assert_eq!(detector.from_content("\n\ndef main():\n    pass"), Some("python".into()));
		assert_eq!(detector.from_content("SELECT * FROM users"), Some("sql".into()));
		assert_eq!(detector.from_content("<?xml version=\"1.0\"?>"), Some("xml".into()));
		assert_eq!(detector.from_content("apiVersion: v1"), Some("yaml".into()));
		assert_eq!(detector.from_content("#!/bin/bash"), Some("bash".into()));
		assert_eq!(detector.from_content("just some words"), None);
	}

	#[test]
	fn invalid_hint_pattern_is_reported() {
		let mut patterns = Patterns::builtin().clone();
		patterns.language_hints[0].pattern = "(".into();
		assert!(matches!(LanguageDetector::new(&patterns), Err(ExtractionError::InvalidPattern { .. })));
	}
}
