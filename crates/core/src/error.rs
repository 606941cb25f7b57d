//! Error types for the extraction pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Failures of the filter/extract/format pipeline.
///
/// An extraction either returns a complete output or one of these; there is
/// no partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
	/// The input is not markup at all (binary payload, NUL bytes).
	#[error("markup could not be parsed: {0}")]
	Unparseable(String),

	/// Raw bytes handed to the byte-level entry point were not UTF-8.
	#[error("markup is not valid UTF-8: {0}")]
	InvalidEncoding(String),

	/// A configured selector or regex pattern failed to compile.
	#[error("invalid pattern `{pattern}`: {reason}")]
	InvalidPattern { pattern: String, reason: String },
}

impl ExtractionError {
	pub(crate) fn pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
		ExtractionError::InvalidPattern {
			pattern: pattern.into(),
			reason: reason.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pattern_error_display() {
		let err = ExtractionError::pattern("div[", "unexpected end of input");
		assert_eq!(err.to_string(), "invalid pattern `div[`: unexpected end of input");
	}
}
