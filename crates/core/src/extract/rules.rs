//! Generic recognition rules, tried in order; the first match wins.

use scraper::ElementRef;

use crate::block::{ContentBlock, PanelKind};
use crate::extract::text::{self, Gather};
use crate::extract::{LayoutFamily, Walk, wiki};

/// Whether a rule ends the current inline run before it builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
	Block,
	Inline,
}

/// A `(predicate, constructor)` pair.
pub(crate) struct Rule {
	pub(crate) name: &'static str,
	pub(crate) placement: Placement,
	pub(crate) matches: fn(&ElementRef<'_>) -> bool,
	pub(crate) build: fn(ElementRef<'_>, &mut Walk<'_>),
}

pub(crate) const HIDDEN: Rule = Rule {
	name: "hidden",
	placement: Placement::Inline,
	matches: text::is_hidden,
	build: skip,
};

pub(crate) static GENERIC_RULES: &[Rule] = &[
	HIDDEN,
	Rule {
		name: "heading",
		placement: Placement::Block,
		matches: is_heading,
		build: build_heading,
	},
	Rule {
		name: "code",
		placement: Placement::Block,
		matches: |e| e.value().name() == "pre",
		build: build_code,
	},
	Rule {
		name: "table",
		placement: Placement::Block,
		matches: |e| e.value().name() == "table",
		build: |e, walk| build_table(e, walk, |_| false),
	},
	Rule {
		name: "list",
		placement: Placement::Block,
		matches: |e| text::is_named(e, &["ul", "ol"]),
		build: build_list,
	},
	Rule {
		name: "quote",
		placement: Placement::Block,
		matches: |e| e.value().name() == "blockquote",
		build: build_quote,
	},
	Rule {
		name: "paragraph",
		placement: Placement::Block,
		matches: |e| e.value().name() == "p",
		build: build_paragraph,
	},
];

fn skip(_: ElementRef<'_>, _: &mut Walk<'_>) {}

fn is_heading(element: &ElementRef<'_>) -> bool {
	text::is_named(element, &["h1", "h2", "h3", "h4", "h5", "h6"])
}

fn build_heading(element: ElementRef<'_>, walk: &mut Walk<'_>) {
	let level = element.value().name()[1..].parse::<u8>().unwrap_or(1);
	let raw = text::gather(element, walk.gather());
	if let Some(text) = walk.single_line(&raw).filter(|t| t.chars().any(char::is_alphanumeric)) {
		walk.push(ContentBlock::heading(level, text));
	}
}

fn build_code(element: ElementRef<'_>, walk: &mut Walk<'_>) {
	push_code(element, element, walk);
}

/// Emits a code block from the text below `body`; `element` is where the
/// language hints are looked up.
pub(crate) fn push_code(element: ElementRef<'_>, body: ElementRef<'_>, walk: &mut Walk<'_>) {
	let code = text::trim_code(&text::gather(
		body,
		Gather {
			code: true,
			..Gather::default()
		},
	));
	if code.is_empty() {
		return;
	}
	let language = walk.languages().detect(element, &code);
	walk.push(ContentBlock::code(language, code));
}

/// Rows of the table's own `tr` elements (not those of nested tables) with
/// empty rows and columns trimmed. A table that collapses to one cell is
/// walked as a plain container.
pub(crate) fn build_table(element: ElementRef<'_>, walk: &mut Walk<'_>, drop_cell: fn(&ElementRef<'_>) -> bool) {
	let gather = walk.gather();
	let mut rows: Vec<Vec<String>> = element
		.descendants()
		.filter_map(ElementRef::wrap)
		.filter(|e| e.value().name() == "tr" && !text::is_hidden(e))
		.filter(|tr| text::closest(tr, "table").map(|t| t.id()) == Some(element.id()))
		.map(|tr| {
			tr.children()
				.filter_map(ElementRef::wrap)
				.filter(|cell| text::is_named(cell, &["td", "th"]) && !drop_cell(cell) && !text::is_hidden(cell))
				.map(|cell| walk.single_line(&text::gather(cell, gather)).unwrap_or_default())
				.collect()
		})
		.collect();

	trim_table(&mut rows);

	if rows.len() == 1 && rows[0].len() == 1 {
		walk.walk_children(element);
		return;
	}

	if let Some(caption) = element.children().filter_map(ElementRef::wrap).find(|e| e.value().name() == "caption") {
		let raw = text::gather(caption, gather);
		if let Some(text) = walk.single_line(&raw) {
			walk.push(ContentBlock::paragraph(text));
		}
	}

	if !rows.is_empty() {
		walk.push(ContentBlock::Table { rows });
	}
}

/// Pads rows to equal width, then drops rows and columns with no text.
fn trim_table(rows: &mut Vec<Vec<String>>) {
	rows.retain(|row| row.iter().any(|cell| !cell.is_empty()));
	let width = rows.iter().map(Vec::len).max().unwrap_or(0);
	for row in rows.iter_mut() {
		row.resize(width, String::new());
	}

	let keep: Vec<bool> = (0..width).map(|col| rows.iter().any(|row| !row[col].is_empty())).collect();
	for row in rows.iter_mut() {
		let mut col = 0;
		row.retain(|_| {
			let kept = keep[col];
			col += 1;
			kept
		});
	}
}

/// One `ListItem` per `li`, nested lists one level deeper, in document order.
/// Nesting is tracked on an explicit stack.
pub(crate) fn build_list(element: ElementRef<'_>, walk: &mut Walk<'_>) {
	let gather = Gather {
		skip_lists: true,
		..walk.gather()
	};
	let mut pending = Vec::new();
	queue_items(element, 0, walk, &mut pending);
	pending.reverse();

	while let Some((item, depth, task_list)) = pending.pop() {
		let raw = text::gather(item, gather);
		if let Some(text) = walk.single_line(&raw) {
			let prefix = if task_list { wiki::task_prefix(&item) } else { "" };
			walk.push(ContentBlock::ListItem {
				depth,
				text: format!("{prefix}{text}"),
			});
		}

		let nested: Vec<ElementRef<'_>> = item
			.descendants()
			.skip(1)
			.filter_map(ElementRef::wrap)
			.filter(|e| text::is_named(e, &["ul", "ol"]) && !text::is_hidden(e))
			.filter(|e| text::closest(e, "li").map(|li| li.id()) == Some(item.id()))
			.collect();
		let start = pending.len();
		for list in nested {
			queue_items(list, depth + 1, walk, &mut pending);
		}
		pending[start..].reverse();
	}
}

/// Appends the visible `li` children of `list` in document order.
fn queue_items<'a>(list: ElementRef<'a>, depth: usize, walk: &Walk<'_>, pending: &mut Vec<(ElementRef<'a>, usize, bool)>) {
	let task_list = walk.family() == LayoutFamily::Wiki && wiki::is_task_list(&list);
	pending.extend(
		list.children()
			.filter_map(ElementRef::wrap)
			.filter(|e| e.value().name() == "li" && !text::is_hidden(e))
			.map(|item| (item, depth, task_list)),
	);
}

fn build_quote(element: ElementRef<'_>, walk: &mut Walk<'_>) {
	push_panel(PanelKind::Quote, element, walk);
}

/// Emits a panel from the blocks found below `element`, flattened to text.
pub(crate) fn push_panel(kind: PanelKind, element: ElementRef<'_>, walk: &mut Walk<'_>) {
	let text = walk
		.sub_blocks(element)
		.iter()
		.map(|block| match block {
			ContentBlock::ListItem { depth, text } => format!("{}- {text}", "  ".repeat(*depth)),
			other => other.text(),
		})
		.collect::<Vec<_>>()
		.join("\n");
	if !text.trim().is_empty() {
		walk.push(ContentBlock::Panel { kind, text });
	}
}

fn build_paragraph(element: ElementRef<'_>, walk: &mut Walk<'_>) {
	walk.walk_children(element);
	walk.flush();
}
