//! Junk-line and markup-remnant cleanup applied to extracted text.

use std::sync::LazyLock;

use regex_lite::Regex;

static MACRO_REMNANT_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{[a-zA-Z]+(?::[a-zA-Z]+)?\}.*?\{[a-zA-Z]+\}").expect("MACRO_REMNANT_RE should compile"));
static ISSUE_REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"JIRA:\s*([A-Z]+-\d+)").expect("ISSUE_REF_RE should compile"));

/// Recognises lines made only of script leftovers (`undefined`, `NaN`, ...)
/// and separator punctuation.
#[derive(Debug, Clone)]
pub(crate) struct JunkFilter {
	tokens: Vec<String>,
}

impl JunkFilter {
	pub(crate) fn new(tokens: &[String]) -> Self {
		Self {
			tokens: tokens.iter().filter(|t| !t.is_empty()).map(|t| t.to_lowercase()).collect(),
		}
	}

	pub(crate) fn is_junk_line(&self, line: &str) -> bool {
		let mut remaining = line.to_lowercase();
		for token in &self.tokens {
			remaining = remaining.replace(token.as_str(), "");
		}
		remaining.trim().chars().all(|c| c.is_whitespace() || "/-•·|:".contains(c))
	}
}

/// Drops leftover wiki macro markup such as `{code:java}...{code}`.
pub(crate) fn strip_macro_remnants(text: &str) -> String {
	MACRO_REMNANT_RE.replace_all(text, "").into_owned()
}

/// Brackets issue keys after a `JIRA:` label so they survive as one token.
pub(crate) fn bracket_issue_refs(text: &str) -> String {
	ISSUE_REF_RE.replace_all(text, "JIRA: [$1]").into_owned()
}
