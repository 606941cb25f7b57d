use std::path::PathBuf;

use serde::Serialize;
use webtotext::FormatMode;

/// Bumped whenever a field of [`CommandResult`] changes meaning.
pub const SCHEMA_VERSION: u32 = 1;

/// What every command prints, in JSON or as text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T> {
	pub schema_version: u32,
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inputs: Option<CommandInputs>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	pub duration_ms: u64,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub artifacts: Vec<Artifact>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub warnings: Vec<String>,
}

/// The page, tab or file a command worked on.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInputs {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tab: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub file: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub endpoint: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Stable failure categories for scripts reading the JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	BrowserUnreachable,
	BrowserLaunchFailed,
	TabNotFound,
	NavigationFailed,
	Timeout,
	JsEvalFailed,
	ProtocolError,
	ExtractionFailed,
	InvalidPattern,
	ConfigError,
	IoError,
	InvalidInput,
}

impl ErrorCode {
	pub fn as_str(self) -> &'static str {
		match self {
			ErrorCode::BrowserUnreachable => "BROWSER_UNREACHABLE",
			ErrorCode::BrowserLaunchFailed => "BROWSER_LAUNCH_FAILED",
			ErrorCode::TabNotFound => "TAB_NOT_FOUND",
			ErrorCode::NavigationFailed => "NAVIGATION_FAILED",
			ErrorCode::Timeout => "TIMEOUT",
			ErrorCode::JsEvalFailed => "JS_EVAL_FAILED",
			ErrorCode::ProtocolError => "PROTOCOL_ERROR",
			ErrorCode::ExtractionFailed => "EXTRACTION_FAILED",
			ErrorCode::InvalidPattern => "INVALID_PATTERN",
			ErrorCode::ConfigError => "CONFIG_ERROR",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::InvalidInput => "INVALID_INPUT",
		}
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A file of extracted text written by the command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
	#[serde(rename = "type")]
	pub artifact_type: ArtifactType,
	pub path: PathBuf,
	pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
	Markdown,
	Text,
}

impl ArtifactType {
	pub fn for_mode(mode: FormatMode) -> Self {
		match mode {
			FormatMode::Markdown => ArtifactType::Markdown,
			FormatMode::Plain => ArtifactType::Text,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			ArtifactType::Markdown => "markdown",
			ArtifactType::Text => "text",
		}
	}
}
