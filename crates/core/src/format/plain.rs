use crate::block::ContentBlock;
use crate::format::list_item;

pub(crate) fn render_block(block: &ContentBlock) -> String {
	match block {
		ContentBlock::Heading { text, .. } | ContentBlock::Paragraph { text } => text.clone(),
		ContentBlock::CodeBlock { text, .. } => text
			.lines()
			.map(|line| if line.is_empty() { String::new() } else { format!("    {line}") })
			.collect::<Vec<_>>()
			.join("\n"),
		ContentBlock::Table { rows } => table(rows),
		ContentBlock::ListItem { depth, text } => list_item(*depth, text),
		ContentBlock::Panel { kind, text } => match kind.label() {
			Some(label) => format!("{label}: {text}"),
			None => text.clone(),
		},
	}
}

/// Space-padded columns, two spaces apart.
fn table(rows: &[Vec<String>]) -> String {
	let width = rows.iter().map(Vec::len).max().unwrap_or(0);
	let widths: Vec<usize> = (0..width)
		.map(|col| rows.iter().filter_map(|row| row.get(col)).map(|cell| cell.chars().count()).max().unwrap_or(0))
		.collect();

	rows.iter()
		.map(|row| {
			let line = widths
				.iter()
				.enumerate()
				.map(|(col, w)| {
					let cell = row.get(col).map(String::as_str).unwrap_or("");
					format!("{cell}{}", " ".repeat(w.saturating_sub(cell.chars().count())))
				})
				.collect::<Vec<_>>()
				.join("  ");
			line.trim_end().to_string()
		})
		.collect::<Vec<_>>()
		.join("\n")
}
