//! Page metadata read from the raw markup.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::extract::LayoutFamily;

/// What the page says about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
	pub title: Option<String>,
	pub site: Option<String>,
	pub description: Option<String>,
	/// Wiki breadcrumb trail, outermost first.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub breadcrumbs: Vec<String>,
	/// Wiki "created by / last updated" line.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_info: Option<String>,
}

pub(crate) fn read_metadata(html: &Html, url: Option<&str>, family: LayoutFamily) -> PageMetadata {
	let generic_title = meta_content(html, "og:title")
		.or_else(|| meta_content(html, "twitter:title"))
		.or_else(|| first_text(html, "title"));

	let mut metadata = PageMetadata {
		title: generic_title,
		site: meta_content(html, "og:site_name").or_else(|| url.and_then(extract_domain)),
		description: meta_content(html, "og:description").or_else(|| meta_content(html, "description")),
		..PageMetadata::default()
	};

	if family == LayoutFamily::Wiki {
		if let Some(title) = first_text(html, "#title-text").or_else(|| first_text(html, "h1.pagetitle")) {
			metadata.title = Some(title);
		}
		metadata.breadcrumbs = breadcrumbs(html);
		metadata.page_info = first_text(html, "#page-metadata-info");
	}

	metadata
}

fn select_first<'a>(html: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
	let selector = Selector::parse(selector).ok()?;
	html.select(&selector).next()
}

fn first_text(html: &Html, selector: &str) -> Option<String> {
	select_first(html, selector).map(|e| collapse(&e.text().collect::<String>())).filter(|t| !t.is_empty())
}

fn meta_content(html: &Html, name: &str) -> Option<String> {
	let selector = Selector::parse("meta[content]").ok()?;
	html.select(&selector)
		.find(|meta| {
			let value = meta.value();
			[value.attr("property"), value.attr("name")]
				.into_iter()
				.flatten()
				.any(|key| key.eq_ignore_ascii_case(name))
		})
		.and_then(|meta| meta.value().attr("content"))
		.map(collapse)
		.filter(|content| !content.is_empty())
}

fn breadcrumbs(html: &Html) -> Vec<String> {
	let Some(trail) = select_first(html, "#breadcrumbs") else {
		return Vec::new();
	};
	let items: Vec<String> = trail
		.descendants()
		.filter_map(ElementRef::wrap)
		.filter(|e| e.value().name() == "li")
		.map(|li| collapse(&li.text().collect::<String>()))
		.filter(|t| !t.is_empty())
		.collect();
	if !items.is_empty() {
		return items;
	}
	let text = collapse(&trail.text().collect::<String>());
	if text.is_empty() { Vec::new() } else { vec![text] }
}

fn collapse(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Host of an http(s) URL without a leading `www.`.
pub fn extract_domain(url: &str) -> Option<String> {
	let parsed = url::Url::parse(url).ok()?;
	let host = parsed.host_str()?;
	Some(host.trim_start_matches("www.").to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn title_prefers_og_then_title_tag() {
		let html = Html::parse_document(r#"<html><head><meta property="og:title" content="OG Title"><title>Doc Title</title></head></html>"#);
		assert_eq!(read_metadata(&html, None, LayoutFamily::Generic).title, Some("OG Title".into()));

		let html = Html::parse_document("<html><head><title> Doc   Title </title></head></html>");
		assert_eq!(read_metadata(&html, None, LayoutFamily::Generic).title, Some("Doc Title".into()));
	}

	#[test]
	fn site_falls_back_to_url_domain() {
		let html = Html::parse_document("<html><head><title>x</title></head></html>");
		let meta = read_metadata(&html, Some("https://www.example.com/path"), LayoutFamily::Generic);
		assert_eq!(meta.site, Some("example.com".into()));
	}

	#[test]
	fn wiki_pages_read_title_breadcrumbs_and_page_info() {
		let html = Html::parse_document(
			"<html><head><title>Runbook - Ops - Wiki</title></head><body>\
			 <ol id='breadcrumbs'><li><a>Ops</a></li><li><a>Runbooks</a></li></ol>\
			 <h1 id='title-text'><a>Runbook</a></h1>\
			 <div id='page-metadata-info'>Created by Ada, last updated yesterday</div></body></html>",
		);
		let meta = read_metadata(&html, None, LayoutFamily::Wiki);
		assert_eq!(meta.title, Some("Runbook".into()));
		assert_eq!(meta.breadcrumbs, vec!["Ops".to_string(), "Runbooks".to_string()]);
		assert_eq!(meta.page_info, Some("Created by Ada, last updated yesterday".into()));
	}
}
