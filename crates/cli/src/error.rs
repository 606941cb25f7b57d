use std::path::PathBuf;

use thiserror::Error;
use webtotext::ExtractionError;
use webtotext_runtime::FetchError;

use crate::output::ErrorCode;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Fetch(#[from] FetchError),

	#[error(transparent)]
	Extraction(#[from] ExtractionError),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("cannot write {}: {source}", .path.display())]
	Save { path: PathBuf, source: std::io::Error },

	#[error("config error: {0}")]
	Config(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),
}

impl CliError {
	pub fn code(&self) -> ErrorCode {
		match self {
			CliError::Fetch(err) => match err {
				FetchError::Unreachable { .. } => ErrorCode::BrowserUnreachable,
				FetchError::NoTabs | FetchError::TabNotFound(_) => ErrorCode::TabNotFound,
				FetchError::Navigation { .. } => ErrorCode::NavigationFailed,
				FetchError::Timeout { .. } => ErrorCode::Timeout,
				FetchError::Evaluation(_) => ErrorCode::JsEvalFailed,
				FetchError::BrowserNotFound | FetchError::Launch(_) => ErrorCode::BrowserLaunchFailed,
				FetchError::Http(_) | FetchError::WebSocket(_) | FetchError::Protocol { .. } | FetchError::ConnectionClosed | FetchError::Json(_) => {
					ErrorCode::ProtocolError
				}
			},
			CliError::Extraction(ExtractionError::InvalidPattern { .. }) => ErrorCode::InvalidPattern,
			CliError::Extraction(_) => ErrorCode::ExtractionFailed,
			CliError::Io(_) | CliError::Save { .. } => ErrorCode::IoError,
			CliError::Config(_) => ErrorCode::ConfigError,
			CliError::InvalidInput(_) => ErrorCode::InvalidInput,
		}
	}
}
