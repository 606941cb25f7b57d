//! Dedicated rules for wiki (Confluence-style) pages, tried before the
//! generic ones.

use scraper::ElementRef;

use crate::block::PanelKind;
use crate::extract::Walk;
use crate::extract::rules::{self, HIDDEN, Placement, Rule};
use crate::extract::text;

pub(crate) static WIKI_RULES: &[Rule] = &[
	HIDDEN,
	Rule {
		name: "wiki-code",
		placement: Placement::Block,
		matches: is_code_panel,
		build: build_code_panel,
	},
	Rule {
		name: "wiki-callout",
		placement: Placement::Block,
		matches: is_callout,
		build: |e, walk| rules::push_panel(panel_kind(&e), e, walk),
	},
	Rule {
		name: "wiki-task-list",
		placement: Placement::Block,
		matches: |e| e.value().name() == "ul" && is_task_list(e),
		build: rules::build_list,
	},
	Rule {
		name: "wiki-table",
		placement: Placement::Block,
		matches: |e| e.value().name() == "table" && (text::has_class(e, "confluenceTable") || text::has_class(e, "aui")),
		build: |e, walk| rules::build_table(e, walk, |cell| text::has_class(cell, "numberingColumn")),
	},
	Rule {
		name: "wiki-status",
		placement: Placement::Inline,
		matches: is_status_macro,
		build: |e, walk| walk.push_inline(&status_text(&e)),
	},
];

const CODE_PANEL_CLASSES: &[&str] = &["code", "codeContent", "syntaxhighlighter", "preformatted"];
const CALLOUT_CLASSES: &[&str] = &["confluence-information-macro", "aui-message", "panel"];

fn is_code_panel(element: &ElementRef<'_>) -> bool {
	match element.value().name() {
		"div" => CODE_PANEL_CLASSES.iter().any(|c| text::has_class(element, c)),
		"pre" => text::has_class(element, "syntaxhighlighter-pre"),
		_ => false,
	}
}

fn build_code_panel(element: ElementRef<'_>, walk: &mut Walk<'_>) {
	let body = element
		.descendants()
		.skip(1)
		.filter_map(ElementRef::wrap)
		.find(|e| e.value().name() == "pre")
		.unwrap_or(element);
	rules::push_code(element, body, walk);
}

fn is_callout(element: &ElementRef<'_>) -> bool {
	CALLOUT_CLASSES.iter().any(|c| text::has_class(element, c))
}

/// Panel flavour from the callout's classes.
pub(crate) fn panel_kind(element: &ElementRef<'_>) -> PanelKind {
	let classes: Vec<String> = element.value().classes().map(str::to_ascii_lowercase).collect();
	let any = |test: &dyn Fn(&str) -> bool| classes.iter().any(|c| test(c.as_str()));

	if any(&|c| c.ends_with("-tip") || c == "aui-message-success") {
		PanelKind::Tip
	} else if any(&|c| c.ends_with("-note") || c == "aui-message-info") {
		PanelKind::Note
	} else if any(&|c| c.ends_with("-warning")) {
		PanelKind::Warning
	} else if any(&|c| c.ends_with("-error")) {
		PanelKind::Error
	} else {
		PanelKind::Info
	}
}

pub(crate) fn is_task_list(element: &ElementRef<'_>) -> bool {
	text::has_class(element, "inline-task-list")
}

pub(crate) fn task_prefix(item: &ElementRef<'_>) -> &'static str {
	if text::has_class(item, "checked") { "[x] " } else { "[ ] " }
}

pub(crate) fn is_status_macro(element: &ElementRef<'_>) -> bool {
	element.value().name() == "span" && text::has_class(element, "status-macro")
}

const SUCCESS_CLASSES: &[&str] = &["status-green", "aui-lozenge-success"];
const FAILED_CLASSES: &[&str] = &["status-red", "aui-lozenge-error"];
const WARNING_CLASSES: &[&str] = &["status-yellow", "aui-lozenge-current", "aui-lozenge-moved"];

/// `[STATUS: LABEL] text`, with the label taken from the macro colour.
pub(crate) fn status_text(element: &ElementRef<'_>) -> String {
	let any = |classes: &[&str]| classes.iter().any(|c| text::has_class(element, c));
	let label = if any(SUCCESS_CLASSES) {
		"SUCCESS"
	} else if any(FAILED_CLASSES) {
		"FAILED"
	} else if any(WARNING_CLASSES) {
		"WARNING"
	} else {
		"INFO"
	};
	let text = text::collapse_whitespace(&element.text().collect::<String>());
	format!("[STATUS: {label}] {text}")
}
