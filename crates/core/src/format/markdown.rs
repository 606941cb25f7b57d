use crate::block::ContentBlock;
use crate::format::list_item;

pub(crate) fn render_block(block: &ContentBlock) -> String {
	match block {
		ContentBlock::Heading { level, text } => format!("{} {text}", "#".repeat(usize::from((*level).clamp(1, 6)))),
		ContentBlock::Paragraph { text } => text.clone(),
		ContentBlock::CodeBlock { language, text } => {
			let fence = fence_for(text);
			format!("{fence}{}\n{text}\n{fence}", language.as_deref().unwrap_or(""))
		}
		ContentBlock::Table { rows } => table(rows),
		ContentBlock::ListItem { depth, text } => list_item(*depth, text),
		ContentBlock::Panel { kind, text } => {
			let body = match kind.label() {
				Some(label) => format!("{label}: {text}"),
				None => text.clone(),
			};
			body.lines().map(|line| format!("> {line}").trim_end().to_string()).collect::<Vec<_>>().join("\n")
		}
	}
}

/// Three backticks, or one more than the longest backtick run in `text`.
fn fence_for(text: &str) -> String {
	let longest = text.split(|c| c != '`').map(str::len).max().unwrap_or(0);
	"`".repeat(longest.max(2) + 1)
}

fn table(rows: &[Vec<String>]) -> String {
	let Some(header) = rows.first() else {
		return String::new();
	};
	let width = rows.iter().map(Vec::len).max().unwrap_or(0);

	let row = |cells: &[String]| {
		let cells: Vec<String> = (0..width).map(|i| cells.get(i).map(|c| escape_cell(c)).unwrap_or_default()).collect();
		format!("| {} |", cells.join(" | "))
	};

	let mut lines = vec![row(header), format!("|{}", " --- |".repeat(width))];
	lines.extend(rows[1..].iter().map(|r| row(r)));
	lines.join("\n")
}

fn escape_cell(cell: &str) -> String {
	cell.replace('|', "\\|").replace('\n', " ")
}
