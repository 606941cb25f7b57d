//! `extract` and `tab`: one page in, one file out.

use chrono::Local;
use tracing::info;
use webtotext::{Pipeline, RawDocument};
use webtotext_runtime::{PageSource, RawPage, TabSelector, Target};

use crate::commands::{Completed, finish};
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::{CommandInputs, CommandResult, ExtractData, ResultBuilder};
use crate::save::{page_file_name, write_text_file};

/// Adds `https://` when `input` carries no scheme.
pub(crate) fn normalize_url(input: &str) -> Result<String> {
	let input = input.trim();
	if input.is_empty() {
		return Err(CliError::InvalidInput("URL is empty".into()));
	}
	let has_scheme = input.contains("://") || ["about:", "data:", "file:"].iter().any(|scheme| input.starts_with(scheme));
	let url = if has_scheme { input.to_string() } else { format!("https://{input}") };
	url::Url::parse(&url).map_err(|e| CliError::InvalidInput(format!("{input:?} is not a valid URL: {e}")))?;
	Ok(url)
}

fn inputs(settings: &Settings) -> CommandInputs {
	CommandInputs {
		endpoint: Some(settings.endpoint.to_string()),
		mode: Some(settings.mode.to_string()),
		..CommandInputs::default()
	}
}

pub async fn run_extract(settings: &Settings, input: &str) -> CommandResult<ExtractData> {
	let builder = ResultBuilder::new("extract");
	let url = match normalize_url(input) {
		Ok(url) => url,
		Err(err) => return finish(builder, Err(err)),
	};
	info!(target = "webtotext", %url, endpoint = %settings.endpoint, "extract");

	let builder = builder.inputs(CommandInputs {
		url: Some(url.clone()),
		..inputs(settings)
	});
	finish(builder, fetch_and_process(settings, &Target::Url(url)).await)
}

pub async fn run_tab(settings: &Settings, selector: &TabSelector) -> CommandResult<ExtractData> {
	info!(target = "webtotext", tab = %selector, endpoint = %settings.endpoint, "tab");
	let builder = ResultBuilder::new("tab").inputs(CommandInputs {
		tab: Some(selector.to_string()),
		..inputs(settings)
	});
	finish(builder, fetch_and_process(settings, &Target::Tab(selector.clone())).await)
}

async fn fetch_and_process(settings: &Settings, target: &Target) -> Result<Completed<ExtractData>> {
	// Bad patterns fail before the browser is touched.
	let pipeline = settings.pipeline()?;
	let page = settings.fetcher().fetch(target).await?;
	info!(url = %page.url, bytes = page.html.len(), "fetched page");
	process_page(settings, &pipeline, page)
}

/// Runs the pipeline over a fetched page and saves the result.
pub(crate) fn process_page(settings: &Settings, pipeline: &Pipeline, page: RawPage) -> Result<Completed<ExtractData>> {
	let title = Some(page.title).filter(|t| !t.trim().is_empty());
	process_document(settings, pipeline, RawDocument::new(page.html, Some(page.url)), title)
}

pub(crate) fn process_document(settings: &Settings, pipeline: &Pipeline, raw: RawDocument, fallback_title: Option<String>) -> Result<Completed<ExtractData>> {
	let extraction = pipeline.run_with_metadata(&raw, settings.mode)?;
	let text = extraction.output.text;

	let mut warnings = Vec::new();
	let mut artifacts = Vec::new();
	let mut path = None;

	if text.is_empty() {
		warnings.push("no readable content found; nothing was saved".to_string());
	} else if settings.save {
		let name = page_file_name(raw.url(), extraction.family, settings.mode, Local::now());
		let artifact = write_text_file(&settings.output_dir, &name, &text, settings.mode)?;
		path = Some(artifact.path.clone());
		artifacts.push(artifact);
	}

	let data = ExtractData {
		url: raw.url().map(str::to_string),
		title: extraction.metadata.title.or(fallback_title),
		family: extraction.family,
		mode: settings.mode,
		blocks: extraction.blocks.len(),
		chars: text.chars().count(),
		path,
		content: settings.print.then_some(text),
	};

	Ok(Completed { data, artifacts, warnings })
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;
	use webtotext::FormatMode;

	use super::*;
	use crate::cli::GlobalArgs;

	fn settings_in(dir: &TempDir, print: bool) -> Settings {
		Settings::resolve(&GlobalArgs {
			output_dir: Some(dir.path().to_path_buf()),
			print,
			..GlobalArgs::default()
		})
		.unwrap()
	}

	#[test]
	fn urls_without_scheme_get_https() {
		assert_eq!(normalize_url("example.com/docs").unwrap(), "https://example.com/docs");
		assert_eq!(normalize_url(" http://example.com ").unwrap(), "http://example.com");
		assert_eq!(normalize_url("about:blank").unwrap(), "about:blank");
		assert!(matches!(normalize_url("  "), Err(CliError::InvalidInput(_))));
		assert!(normalize_url("exa mple .com").is_err());
	}

	#[test]
	fn page_is_extracted_and_saved() {
		let dir = TempDir::new().unwrap();
		let settings = settings_in(&dir, false);
		let pipeline = settings.pipeline().unwrap();
		let page = RawPage {
			html: "<html><head><title>Notes</title></head><body><nav>Menu</nav><p>Remember to water the plants every other day.</p></body></html>".into(),
			url: "https://www.example.com/notes".into(),
			title: "Notes".into(),
		};

		let done = process_page(&settings, &pipeline, page).unwrap();
		assert_eq!(done.data.title.as_deref(), Some("Notes"));
		assert_eq!(done.data.mode, FormatMode::Markdown);
		assert!(done.data.content.is_none());
		assert!(done.warnings.is_empty());

		let saved = done.data.path.unwrap();
		assert!(saved.starts_with(dir.path()));
		let name = saved.file_name().unwrap().to_string_lossy().into_owned();
		assert!(name.starts_with("example.com_notes_") && name.ends_with(".md"), "{name}");
		assert_eq!(std::fs::read_to_string(&saved).unwrap(), "# Notes\n\nRemember to water the plants every other day.\n");
	}

	#[test]
	fn empty_pages_warn_and_save_nothing() {
		let dir = TempDir::new().unwrap();
		let settings = settings_in(&dir, true);
		let pipeline = settings.pipeline().unwrap();
		let raw = RawDocument::new("<html><body><nav>Menu</nav></body></html>", None);

		let done = process_document(&settings, &pipeline, raw, None).unwrap();
		assert_eq!(done.data.blocks, 0);
		assert_eq!(done.data.content.as_deref(), Some(""));
		assert!(done.data.path.is_none());
		assert_eq!(done.warnings.len(), 1);
		assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
	}
}
