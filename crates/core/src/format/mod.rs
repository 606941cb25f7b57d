//! Rendering of content blocks to plain text or markdown.

mod markdown;
mod plain;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::block::ContentBlock;

/// Output flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
	Plain,
	#[default]
	Markdown,
}

impl FormatMode {
	/// File extension used when the output is saved.
	pub fn extension(self) -> &'static str {
		match self {
			FormatMode::Plain => "txt",
			FormatMode::Markdown => "md",
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			FormatMode::Plain => "plain",
			FormatMode::Markdown => "markdown",
		}
	}
}

impl fmt::Display for FormatMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FormatMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"plain" | "text" | "txt" => Ok(FormatMode::Plain),
			"markdown" | "md" => Ok(FormatMode::Markdown),
			other => Err(format!("unknown format mode '{other}' (expected plain or markdown)")),
		}
	}
}

/// Final rendered text plus the mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedOutput {
	pub text: String,
	pub mode: FormatMode,
}

impl FormattedOutput {
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

/// Renders `blocks` in `mode`.
///
/// Blocks are separated by a blank line, except that consecutive list items
/// are separated by a single newline. An empty block list renders to an empty
/// string; anything else ends with exactly one newline.
pub fn format(blocks: &[ContentBlock], mode: FormatMode) -> FormattedOutput {
	let render: fn(&ContentBlock) -> String = match mode {
		FormatMode::Plain => plain::render_block,
		FormatMode::Markdown => markdown::render_block,
	};

	let mut text = String::new();
	let mut previous: Option<&ContentBlock> = None;
	for block in blocks {
		let rendered = render(block);
		if rendered.trim().is_empty() {
			continue;
		}
		if let Some(previous) = previous {
			let tight = matches!(previous, ContentBlock::ListItem { .. }) && matches!(block, ContentBlock::ListItem { .. });
			text.push_str(if tight { "\n" } else { "\n\n" });
		}
		text.push_str(rendered.trim_end());
		previous = Some(block);
	}

	if !text.is_empty() {
		text.push('\n');
	}

	FormattedOutput { text, mode }
}

fn list_item(depth: usize, text: &str) -> String {
	format!("{}- {text}", "  ".repeat(depth))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_blocks_render_to_empty_string() {
		assert_eq!(format(&[], FormatMode::Markdown).text, "");
		assert_eq!(format(&[], FormatMode::Plain).text, "");
	}

	#[test]
	fn list_items_are_tight_and_other_blocks_are_spaced() {
		let blocks = vec![
			ContentBlock::paragraph("Intro"),
			ContentBlock::ListItem { depth: 0, text: "a".into() },
			ContentBlock::ListItem { depth: 1, text: "b".into() },
			ContentBlock::paragraph("Outro"),
		];
		assert_eq!(format(&blocks, FormatMode::Markdown).text, "Intro\n\n- a\n  - b\n\nOutro\n");
	}

	#[test]
	fn output_ends_with_exactly_one_newline() {
		let out = format(&[ContentBlock::paragraph("trailing\n\n")], FormatMode::Plain);
		assert_eq!(out.text, "trailing\n");
	}

	#[test]
	fn mode_parses_aliases() {
		assert_eq!("md".parse::<FormatMode>(), Ok(FormatMode::Markdown));
		assert_eq!("Plain".parse::<FormatMode>(), Ok(FormatMode::Plain));
		assert!("html".parse::<FormatMode>().is_err());
		assert_eq!(FormatMode::Plain.extension(), "txt");
	}
}
