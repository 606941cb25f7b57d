//! Classified content units produced by the extractor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One classified unit of document content, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
	Heading { level: u8, text: String },
	Paragraph { text: String },
	CodeBlock { language: Option<String>, text: String },
	/// Rows of cells. The first row is treated as the header when rendering.
	Table { rows: Vec<Vec<String>> },
	/// `depth` is zero for top-level items.
	ListItem { depth: usize, text: String },
	Panel { kind: PanelKind, text: String },
}

impl ContentBlock {
	pub fn heading(level: u8, text: impl Into<String>) -> Self {
		ContentBlock::Heading {
			level: level.clamp(1, 6),
			text: text.into(),
		}
	}

	pub fn paragraph(text: impl Into<String>) -> Self {
		ContentBlock::Paragraph { text: text.into() }
	}

	pub fn code(language: Option<String>, text: impl Into<String>) -> Self {
		ContentBlock::CodeBlock {
			language: language.filter(|l| !l.is_empty()),
			text: text.into(),
		}
	}

	/// Short variant name, used in logs.
	pub fn kind_name(&self) -> &'static str {
		match self {
			ContentBlock::Heading { .. } => "heading",
			ContentBlock::Paragraph { .. } => "paragraph",
			ContentBlock::CodeBlock { .. } => "code",
			ContentBlock::Table { .. } => "table",
			ContentBlock::ListItem { .. } => "list-item",
			ContentBlock::Panel { .. } => "panel",
		}
	}

	/// Flattened text of the block, cells joined by tabs and rows by newlines.
	pub fn text(&self) -> String {
		match self {
			ContentBlock::Heading { text, .. }
			| ContentBlock::Paragraph { text }
			| ContentBlock::CodeBlock { text, .. }
			| ContentBlock::ListItem { text, .. }
			| ContentBlock::Panel { text, .. } => text.clone(),
			ContentBlock::Table { rows } => rows.iter().map(|row| row.join("\t")).collect::<Vec<_>>().join("\n"),
		}
	}
}

/// Callout flavour of a [`ContentBlock::Panel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
	Info,
	Note,
	Tip,
	Warning,
	Error,
	/// Plain quotation; rendered without a label.
	Quote,
}

impl PanelKind {
	/// Upper-case label rendered in front of the panel text, if any.
	pub fn label(self) -> Option<&'static str> {
		match self {
			PanelKind::Info => Some("INFO"),
			PanelKind::Note => Some("NOTE"),
			PanelKind::Tip => Some("TIP"),
			PanelKind::Warning => Some("WARNING"),
			PanelKind::Error => Some("ERROR"),
			PanelKind::Quote => None,
		}
	}
}

impl fmt::Display for PanelKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label().unwrap_or("QUOTE"))
	}
}
