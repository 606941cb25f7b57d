//! Text gathering below a single element.

use scraper::{ElementRef, Node};

use crate::extract::wiki;

const INLINE_TAGS: &[&str] = &[
	"a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "del", "dfn", "em", "font", "i", "img", "ins", "kbd", "label", "mark", "q",
	"s", "samp", "small", "span", "strike", "strong", "sub", "sup", "time", "tt", "u", "var", "wbr",
];

const SILENT_TAGS: &[&str] = &["script", "style", "template", "noscript"];

pub(crate) fn is_inline(name: &str) -> bool {
	INLINE_TAGS.contains(&name)
}

/// `hidden`, `aria-hidden="true"` or an inline `display:none` /
/// `visibility:hidden` style.
pub(crate) fn is_hidden(element: &ElementRef<'_>) -> bool {
	let value = element.value();
	if value.attr("hidden").is_some() {
		return true;
	}
	if value.attr("aria-hidden").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
		return true;
	}
	value.attr("style").is_some_and(|style| {
		let style: String = style.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_ascii_lowercase();
		style.contains("display:none") || style.contains("visibility:hidden")
	})
}

pub(crate) fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
	element.value().classes().any(|c| c.eq_ignore_ascii_case(class))
}

pub(crate) fn is_named(element: &ElementRef<'_>, names: &[&str]) -> bool {
	names.contains(&element.value().name())
}

/// Closest ancestor element with tag `name`.
pub(crate) fn closest<'a>(element: &ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
	element.ancestors().filter_map(ElementRef::wrap).find(|a| a.value().name() == name)
}

/// Options for [`gather`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Gather {
	/// Render wiki status lozenges as `[STATUS: ...]`.
	pub(crate) wiki: bool,
	/// Leave out nested `ul`/`ol` subtrees (handled as their own list items).
	pub(crate) skip_lists: bool,
	/// Keep whitespace as-is and skip line-number gutters.
	pub(crate) code: bool,
}

/// Text below `element`. `br` and block boundaries become newlines; hidden
/// subtrees are left out.
pub(crate) fn gather(element: ElementRef<'_>, options: Gather) -> String {
	let mut out = String::new();
	collect(element, &mut out, options);
	out
}

/// Appends the text below `element` to an existing buffer.
pub(crate) fn gather_into(element: ElementRef<'_>, out: &mut String, options: Gather) {
	collect(element, out, options);
}

/// One pending step of [`collect`].
enum Step<'a> {
	Enter(ElementRef<'a>),
	Text(&'a str),
	Break,
}

/// Depth-first over an explicit stack, so nesting depth costs heap rather
/// than call frames.
fn collect(element: ElementRef<'_>, out: &mut String, options: Gather) {
	let mut stack = Vec::new();
	push_children(element, &mut stack);

	while let Some(step) = stack.pop() {
		let el = match step {
			Step::Text(text) => {
				out.push_str(text);
				continue;
			}
			Step::Break => {
				break_line(out);
				continue;
			}
			Step::Enter(el) => el,
		};

		let name = el.value().name();
		if is_hidden(&el) || SILENT_TAGS.contains(&name) {
			continue;
		}
		if options.skip_lists && matches!(name, "ul" | "ol") {
			continue;
		}
		if options.code && has_class(&el, "gutter") {
			continue;
		}
		if name == "br" {
			out.push('\n');
			continue;
		}
		if options.wiki && wiki::is_status_macro(&el) {
			out.push_str(&wiki::status_text(&el));
			continue;
		}

		if is_inline(name) {
			push_children(el, &mut stack);
		} else {
			break_line(out);
			stack.push(Step::Break);
			push_children(el, &mut stack);
		}
	}
}

/// Queues the children of `element` so they pop in document order.
fn push_children<'a>(element: ElementRef<'a>, stack: &mut Vec<Step<'a>>) {
	let start = stack.len();
	for child in element.children() {
		match child.value() {
			Node::Text(text) => stack.push(Step::Text(&**text)),
			Node::Element(_) => {
				if let Some(el) = ElementRef::wrap(child) {
					stack.push(Step::Enter(el));
				}
			}
			_ => {}
		}
	}
	stack[start..].reverse();
}

fn break_line(out: &mut String) {
	if !out.is_empty() && !out.ends_with('\n') {
		out.push('\n');
	}
}

/// Collapses every whitespace run (including newlines) to one space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapses whitespace within each line and drops blank lines.
pub(crate) fn normalize_lines(text: &str) -> Vec<String> {
	text.lines().map(collapse_whitespace).filter(|line| !line.is_empty()).collect()
}

/// Code text: leading blank lines and trailing whitespace removed, inner
/// indentation kept.
pub(crate) fn trim_code(text: &str) -> String {
	let text = text.replace("\r\n", "\n").replace('\u{a0}', " ");
	let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
	let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
	let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
	lines[start..end].join("\n")
}
