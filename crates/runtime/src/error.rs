//! Failures on the browser side of an extraction.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
	/// No debug endpoint answered `/json/version`.
	#[error("no browser with remote debugging at {endpoint}: {reason}\nTry running: {hint}")]
	Unreachable { endpoint: String, reason: String, hint: String },

	#[error("no page tabs are open in the browser")]
	NoTabs,

	#[error("no open tab matches {0:?}")]
	TabNotFound(String),

	#[error("HTTP error: {0}")]
	Http(String),

	#[error("WebSocket error: {0}")]
	WebSocket(String),

	#[error("CDP error {code}: {message}")]
	Protocol { code: i64, message: String },

	#[error("navigation to {url} failed: {reason}")]
	Navigation { url: String, reason: String },

	#[error("{method} timed out after {ms}ms")]
	Timeout { method: String, ms: u64 },

	#[error("page script failed: {0}")]
	Evaluation(String),

	#[error("connection to the page closed")]
	ConnectionClosed,

	#[error("could not find a Chrome, Chromium, Brave or Edge executable")]
	BrowserNotFound,

	#[error("browser launch failed: {0}")]
	Launch(String),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl FetchError {
	/// The browser never produced an answer in time.
	pub fn is_timeout(&self) -> bool {
		matches!(self, FetchError::Timeout { .. })
	}
}

impl From<tokio_tungstenite::tungstenite::Error> for FetchError {
	fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
		FetchError::WebSocket(e.to_string())
	}
}

impl From<reqwest::Error> for FetchError {
	fn from(e: reqwest::Error) -> Self {
		FetchError::Http(e.to_string())
	}
}
