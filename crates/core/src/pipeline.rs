//! Orchestration of the filter, extract and format stages.

use scraper::Html;
use serde::Serialize;
use tracing::debug;

use crate::block::ContentBlock;
use crate::document::{CleanedDocument, RawDocument};
use crate::error::Result;
use crate::extract::{Extractor, LayoutFamily};
use crate::filter::BoilerplateFilter;
use crate::format::{FormatMode, FormattedOutput, format};
use crate::metadata::{PageMetadata, read_metadata};
use crate::patterns::Patterns;

/// Knobs that do not belong to the pattern set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
	/// Prepend the page title (and, for wiki pages, the breadcrumb path and
	/// page info) when the body does not already open with it.
	pub title_heading: bool,
}

impl Default for ExtractOptions {
	fn default() -> Self {
		Self { title_heading: true }
	}
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
	pub family: LayoutFamily,
	pub metadata: PageMetadata,
	pub blocks: Vec<ContentBlock>,
	pub output: FormattedOutput,
}

/// Compiled filter and extractor, reusable across documents.
#[derive(Debug, Clone)]
pub struct Pipeline {
	filter: BoilerplateFilter,
	extractor: Extractor,
	options: ExtractOptions,
}

impl Pipeline {
	/// Compiles `patterns`; an invalid selector or regex fails here.
	pub fn new(patterns: &Patterns, options: ExtractOptions) -> Result<Self> {
		Ok(Self {
			filter: BoilerplateFilter::new(patterns)?,
			extractor: Extractor::new(patterns)?,
			options,
		})
	}

	pub fn clean(&self, raw: &RawDocument) -> Result<CleanedDocument> {
		self.filter.clean(raw)
	}

	/// Content blocks of the cleaned body, without the title preamble.
	pub fn blocks(&self, raw: &RawDocument) -> Result<Vec<ContentBlock>> {
		let cleaned = self.filter.clean(raw)?;
		Ok(self.extractor.extract(&cleaned))
	}

	pub fn run(&self, raw: &RawDocument, mode: FormatMode) -> Result<FormattedOutput> {
		self.run_with_metadata(raw, mode).map(|extraction| extraction.output)
	}

	pub fn run_with_metadata(&self, raw: &RawDocument, mode: FormatMode) -> Result<Extraction> {
		let cleaned = self.filter.clean(raw)?;
		debug!(raw = raw.markup().len(), cleaned = cleaned.markup().len(), "filtered markup");

		let (family, body) = {
			let html = Html::parse_document(cleaned.markup());
			let family = self.extractor.classify(&html);
			(family, self.extractor.extract_html(&html, family))
		};
		let metadata = read_metadata(&Html::parse_document(raw.markup()), raw.url(), family);

		let mut blocks = if self.options.title_heading { preamble(&metadata, family, &body) } else { Vec::new() };
		blocks.extend(body);

		let output = format(&blocks, mode);
		debug!(?family, blocks = blocks.len(), bytes = output.text.len(), %mode, "formatted output");

		Ok(Extraction {
			family,
			metadata,
			blocks,
			output,
		})
	}
}

impl Default for Pipeline {
	fn default() -> Self {
		Self::new(Patterns::builtin(), ExtractOptions::default()).expect("built-in patterns should compile")
	}
}

/// Runs the default pipeline over `raw_markup`.
pub fn extract(raw_markup: &str, mode: FormatMode) -> Result<FormattedOutput> {
	Pipeline::new(Patterns::builtin(), ExtractOptions::default())?.run(&RawDocument::new(raw_markup, None), mode)
}

/// Title heading plus the wiki path and page-info lines. Nothing for an empty
/// body, and no title when the body already opens with it.
fn preamble(metadata: &PageMetadata, family: LayoutFamily, body: &[ContentBlock]) -> Vec<ContentBlock> {
	let mut blocks = Vec::new();
	if body.is_empty() {
		return blocks;
	}

	if let Some(title) = &metadata.title {
		if !opens_with_title(body, title) {
			blocks.push(ContentBlock::heading(1, title.clone()));
		}
	}

	if family == LayoutFamily::Wiki {
		if !metadata.breadcrumbs.is_empty() {
			blocks.push(ContentBlock::paragraph(format!("Path: {}", metadata.breadcrumbs.join(" > "))));
		}
		if let Some(info) = &metadata.page_info {
			blocks.push(ContentBlock::paragraph(info.clone()));
		}
	}

	blocks
}

/// The first block is a heading equal to, or contained in, the title
/// (`<title>` often carries a site suffix).
fn opens_with_title(body: &[ContentBlock], title: &str) -> bool {
	match body.first() {
		Some(ContentBlock::Heading { text, .. }) => {
			let text = text.to_lowercase();
			let title = title.to_lowercase();
			!text.is_empty() && (text == title || title.contains(&text))
		}
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prepends_title_when_body_lacks_it() {
		let raw = RawDocument::new("<html><head><title>Release notes</title></head><body><p>Version 2 is out.</p></body></html>", None);
		let out = Pipeline::default().run(&raw, FormatMode::Markdown).unwrap();
		assert_eq!(out.text, "# Release notes\n\nVersion 2 is out.\n");
	}

	#[test]
	fn does_not_repeat_a_title_the_body_opens_with() {
		let raw = RawDocument::new(
			"<html><head><title>Release notes - Example</title></head><body><h1>Release notes</h1><p>Version 2.</p></body></html>",
			None,
		);
		let out = Pipeline::default().run(&raw, FormatMode::Markdown).unwrap();
		assert_eq!(out.text, "# Release notes\n\nVersion 2.\n");
	}

	#[test]
	fn title_heading_can_be_disabled() {
		let pipeline = Pipeline::new(Patterns::builtin(), ExtractOptions { title_heading: false }).unwrap();
		let raw = RawDocument::new("<html><head><title>T</title></head><body><p>Body</p></body></html>", None);
		assert_eq!(pipeline.run(&raw, FormatMode::Plain).unwrap().text, "Body\n");
	}

	#[test]
	fn boilerplate_only_pages_stay_empty() {
		let raw = RawDocument::new("<html><head><title>Nav only</title></head><body><nav><a href='/'>Home</a></nav></body></html>", None);
		let extraction = Pipeline::default().run_with_metadata(&raw, FormatMode::Markdown).unwrap();
		assert!(extraction.blocks.is_empty());
		assert_eq!(extraction.output.text, "");
	}

	#[test]
	fn wiki_preamble_carries_path_and_page_info() {
		let raw = RawDocument::new(
			"<html><head><meta name='ajs-page-id' content='42'></head><body>\
			 <ol id='breadcrumbs'><li>Ops</li><li>Runbooks</li></ol>\
			 <h1 id='title-text'>Restart procedure</h1>\
			 <div id='page-metadata-info'>Created by Ada</div>\
			 <div id='main-content' class='wiki-content'><p>Drain the node first, then wait for the replicas to catch up before restarting the service on each host in turn.</p></div></body></html>",
			Some("https://wiki.example.com/display/OPS/Restart+procedure".into()),
		);
		let out = Pipeline::default().run(&raw, FormatMode::Plain).unwrap();
		assert_eq!(out.text, "Restart procedure\n\nPath: Ops > Runbooks\n\nCreated by Ada\n\nDrain the node first, then wait for the replicas to catch up before restarting the service on each host in turn.\n");
	}
}
