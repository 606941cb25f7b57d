use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use webtotext::{FormatMode, LayoutFamily};
use webtotext_runtime::TabInfo;

use crate::output::result_builder::TextOutput;

/// Result data for `extract`, `tab` and `convert`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractData {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	pub family: LayoutFamily,
	pub mode: FormatMode,
	pub blocks: usize,
	pub chars: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub path: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
}

impl TextOutput for ExtractData {
	fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
		if let Some(content) = &self.content {
			return out.write_all(content.as_bytes());
		}
		let title = self.title.as_deref().unwrap_or("(untitled)");
		match &self.url {
			Some(url) => writeln!(out, "{} {}", title.bold(), format!("<{url}>").dimmed())?,
			None => writeln!(out, "{}", title.bold())?,
		}
		writeln!(out, "{} page, {} blocks, {} chars of {}", self.family_label(), self.blocks, self.chars, self.mode)
	}
}

impl ExtractData {
	fn family_label(&self) -> &'static str {
		match self.family {
			LayoutFamily::Generic => "generic",
			LayoutFamily::Wiki => "wiki",
		}
	}
}

/// Result data for `tabs`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsData {
	pub tabs: Vec<TabInfo>,
	pub count: usize,
}

impl TextOutput for TabsData {
	fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
		if self.tabs.is_empty() {
			return writeln!(out, "No page tabs are open.");
		}
		for tab in &self.tabs {
			let title = if tab.title.is_empty() { "(untitled)" } else { tab.title.as_str() };
			let marker = if tab.attachable { String::new() } else { format!(" {}", "[attached elsewhere]".yellow()) };
			writeln!(out, "{:>3}  {}{}", tab.index, title.bold(), marker)?;
			writeln!(out, "     {}", tab.url.dimmed())?;
		}
		Ok(())
	}
}

/// Per-tab outcome inside an `all-tabs` run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabOutcome {
	pub index: usize,
	pub title: String,
	pub url: String,
	pub ok: bool,
	pub blocks: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Result data for `all-tabs`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllTabsData {
	pub tabs: Vec<TabOutcome>,
	pub extracted: usize,
	pub failed: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub path: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
}

impl TextOutput for AllTabsData {
	fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
		if let Some(content) = &self.content {
			return out.write_all(content.as_bytes());
		}
		writeln!(out, "Extracted text from {} of {} tabs.", self.extracted, self.tabs.len())?;
		for tab in &self.tabs {
			let status = if tab.ok { "ok".green() } else { "failed".red() };
			writeln!(out, "{:>3}. [{status}] {} ({})", tab.index + 1, tab.title, tab.url)?;
			if let Some(error) = &tab.error {
				writeln!(out, "     {}", error.red())?;
			}
		}
		Ok(())
	}
}

/// Result data for `launch`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchData {
	pub pid: u32,
	pub executable: PathBuf,
	pub user_data_dir: PathBuf,
	pub endpoint: String,
	pub ws_endpoint: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub browser: Option<String>,
}

impl TextOutput for LaunchData {
	fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
		writeln!(out, "Browser running (pid {}) at {}", self.pid, self.endpoint.bold())?;
		if let Some(browser) = &self.browser {
			writeln!(out, "  version: {browser}")?;
		}
		writeln!(out, "  binary:  {}", self.executable.display())?;
		writeln!(out, "  profile: {}", self.user_data_dir.display())
	}
}
