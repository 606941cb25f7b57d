//! Where extracted text lands on disk.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex_lite::Regex;
use tracing::info;
use webtotext::{FormatMode, LayoutFamily, extract_domain};

use crate::error::{CliError, Result};
use crate::output::{Artifact, ArtifactType};

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid filename regex"));

/// Replaces characters that are not allowed in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
	UNSAFE_CHARS.replace_all(name, "_").into_owned()
}

/// File name for one extracted page.
///
/// Wiki pages under `/display/SPACE/Page+Name` or
/// `/wiki/spaces/SPACE/pages/ID/Page+Name` become
/// `confluence_<space>_<page>` (`page` when a space URL names no page);
/// everything else is `<domain>_<path>_<timestamp>`.
pub fn page_file_name(url: Option<&str>, family: LayoutFamily, mode: FormatMode, now: DateTime<Local>) -> String {
	let stamp = now.format("%Y%m%d_%H%M%S");
	let Some(parsed) = url.and_then(|u| url::Url::parse(u).ok()) else {
		return sanitize_file_name(&format!("page_{stamp}.{}", mode.extension()));
	};

	let domain = url.and_then(extract_domain).unwrap_or_else(|| "local".to_string());
	let segments: Vec<&str> = parsed.path().trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();

	let wiki_host = domain.contains("confluence");
	let wiki_name = wiki_space_and_page(&segments);
	let name = match (wiki_name, wiki_host || family == LayoutFamily::Wiki) {
		(Some((space, page)), true) => format!("confluence_{space}_{page}"),
		(None, true) if wiki_host => "confluence_unknown_page".to_string(),
		_ => {
			let path = if segments.is_empty() { "home".to_string() } else { segments.join("_") };
			format!("{domain}_{path}_{stamp}")
		}
	};
	sanitize_file_name(&format!("{name}.{}", mode.extension()))
}

fn wiki_space_and_page(segments: &[&str]) -> Option<(String, String)> {
	if let Some(at) = segments.iter().position(|s| *s == "display") {
		let space = segments.get(at + 1)?;
		let page = segments.get(at + 2)?;
		return Some((space.to_string(), page.replace('+', "_")));
	}

	let at = segments.iter().position(|s| *s == "spaces")?;
	let space = segments.get(at + 1)?;
	let page = segments[at..]
		.iter()
		.position(|s| *s == "pages")
		.filter(|pages| segments.len() > at + pages + 2)
		.and_then(|_| segments.last())
		.map_or_else(|| "page".to_string(), |page| page.replace('+', "_"));
	Some((space.to_string(), page))
}

/// File name for an `all-tabs` run.
pub fn all_tabs_file_name(mode: FormatMode, now: DateTime<Local>) -> String {
	format!("all_tabs_{}.{}", now.format("%Y%m%d_%H%M%S"), mode.extension())
}

/// One tab's section in the combined document.
pub struct TabSection<'a> {
	pub title: &'a str,
	pub url: &'a str,
	/// The formatted text, or the reason the tab could not be extracted.
	pub body: std::result::Result<&'a str, &'a str>,
}

/// Title, extraction time, then one numbered section per tab separated by
/// `---` rules.
pub fn combined_document(sections: &[TabSection<'_>], mode: FormatMode, now: DateTime<Local>) -> String {
	let (h1, h2) = match mode {
		FormatMode::Markdown => ("# ", "## "),
		FormatMode::Plain => ("", ""),
	};

	let mut doc = format!("{h1}Browser Tabs Content\nExtracted: {}\n\n", now.format("%Y-%m-%d %H:%M:%S"));
	for (i, section) in sections.iter().enumerate() {
		let title = if section.title.is_empty() { "Untitled" } else { section.title };
		doc.push_str(&format!("{h2}{}. {title}\nURL: {}\n\n", i + 1, section.url));
		match section.body {
			Ok(text) if text.trim().is_empty() => doc.push_str("(no readable content)\n"),
			Ok(text) => doc.push_str(text.trim_end()),
			Err(reason) => doc.push_str(&format!("Error extracting text: {reason}")),
		}
		doc.push_str("\n\n---\n\n");
	}
	doc
}

/// Writes `text` to `dir/name`, creating `dir` as needed.
pub fn write_text_file(dir: &Path, name: &str, text: &str, mode: FormatMode) -> Result<Artifact> {
	let path: PathBuf = dir.join(name);
	std::fs::create_dir_all(dir).map_err(|source| CliError::Save {
		path: dir.to_path_buf(),
		source,
	})?;
	std::fs::write(&path, text).map_err(|source| CliError::Save { path: path.clone(), source })?;
	info!(path = %path.display(), bytes = text.len(), "saved extracted text");

	Ok(Artifact {
		artifact_type: ArtifactType::for_mode(mode),
		path,
		size_bytes: text.len() as u64,
	})
}

#[cfg(test)]
mod tests {
	use chrono::TimeZone;
	use tempfile::TempDir;

	use super::*;

	fn noon() -> DateTime<Local> {
		Local.with_ymd_and_hms(2024, 3, 9, 12, 30, 5).unwrap()
	}

	#[test]
	fn confluence_display_urls() {
		let name = page_file_name(
			Some("https://confluence.example.com/display/OPS/Restart+Procedure"),
			LayoutFamily::Generic,
			FormatMode::Markdown,
			noon(),
		);
		assert_eq!(name, "confluence_OPS_Restart_Procedure.md");
	}

	#[test]
	fn cloud_wiki_urls_on_wiki_pages() {
		let name = page_file_name(
			Some("https://acme.atlassian.net/wiki/spaces/ENG/pages/12345/Release+Notes"),
			LayoutFamily::Wiki,
			FormatMode::Plain,
			noon(),
		);
		assert_eq!(name, "confluence_ENG_Release_Notes.txt");
	}

	#[test]
	fn cloud_wiki_urls_without_a_page_name_keep_the_space() {
		let overview = page_file_name(
			Some("https://confluence.example.com/wiki/spaces/ENG/overview"),
			LayoutFamily::Generic,
			FormatMode::Markdown,
			noon(),
		);
		assert_eq!(overview, "confluence_ENG_page.md");

		let bare_id = page_file_name(Some("https://acme.atlassian.net/wiki/spaces/ENG/pages/12345"), LayoutFamily::Wiki, FormatMode::Plain, noon());
		assert_eq!(bare_id, "confluence_ENG_page.txt");
	}

	#[test]
	fn confluence_host_without_page_path() {
		let name = page_file_name(Some("https://confluence.example.com/dashboard.action"), LayoutFamily::Wiki, FormatMode::Markdown, noon());
		assert_eq!(name, "confluence_unknown_page.md");
	}

	#[test]
	fn generic_urls_use_domain_path_and_timestamp() {
		let name = page_file_name(Some("https://www.example.com/blog/2024/post"), LayoutFamily::Generic, FormatMode::Markdown, noon());
		assert_eq!(name, "example.com_blog_2024_post_20240309_123005.md");

		let home = page_file_name(Some("https://example.com/"), LayoutFamily::Generic, FormatMode::Plain, noon());
		assert_eq!(home, "example.com_home_20240309_123005.txt");
	}

	#[test]
	fn wiki_layout_on_a_plain_path_keeps_generic_name() {
		let name = page_file_name(Some("https://docs.example.com/guide"), LayoutFamily::Wiki, FormatMode::Markdown, noon());
		assert_eq!(name, "docs.example.com_guide_20240309_123005.md");
	}

	#[test]
	fn unsafe_characters_are_replaced() {
		assert_eq!(sanitize_file_name(r#"a:b*c?d"e<f>g|h\i/j.md"#), "a_b_c_d_e_f_g_h_i_j.md");
		let name = page_file_name(Some("http://localhost:8080/a"), LayoutFamily::Generic, FormatMode::Markdown, noon());
		assert_eq!(name, "localhost_a_20240309_123005.md");
	}

	#[test]
	fn missing_url_falls_back_to_timestamp() {
		assert_eq!(page_file_name(None, LayoutFamily::Generic, FormatMode::Plain, noon()), "page_20240309_123005.txt");
	}

	#[test]
	fn combined_document_layout() {
		let sections = [
			TabSection {
				title: "Guide",
				url: "https://example.com/guide",
				body: Ok("# Guide\n\nBody text.\n"),
			},
			TabSection {
				title: "",
				url: "https://broken.example.com/",
				body: Err("page script failed: boom"),
			},
		];
		let doc = combined_document(&sections, FormatMode::Markdown, noon());
		assert_eq!(
			doc,
			"# Browser Tabs Content\nExtracted: 2024-03-09 12:30:05\n\n\
			 ## 1. Guide\nURL: https://example.com/guide\n\n# Guide\n\nBody text.\n\n---\n\n\
			 ## 2. Untitled\nURL: https://broken.example.com/\n\nError extracting text: page script failed: boom\n\n---\n\n"
		);
		assert_eq!(all_tabs_file_name(FormatMode::Markdown, noon()), "all_tabs_20240309_123005.md");
	}

	#[test]
	fn writes_file_and_reports_artifact() {
		let dir = TempDir::new().unwrap();
		let out_dir = dir.path().join("nested").join("out");
		let artifact = write_text_file(&out_dir, "page.md", "# Hi\n", FormatMode::Markdown).unwrap();
		assert_eq!(artifact.path, out_dir.join("page.md"));
		assert_eq!(artifact.size_bytes, 5);
		assert_eq!(artifact.artifact_type, ArtifactType::Markdown);
		assert_eq!(std::fs::read_to_string(&artifact.path).unwrap(), "# Hi\n");
	}
}
