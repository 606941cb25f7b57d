use clap::ValueEnum;

/// How the result envelope is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Payload on stdout, errors and notes on stderr
	#[default]
	Text,
	/// Pretty-printed JSON envelope
	Json,
	/// One-line JSON envelope
	Ndjson,
}
