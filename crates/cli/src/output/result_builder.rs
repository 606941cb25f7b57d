use std::io::{self, Write};
use std::time::Instant;

use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::output::format::OutputFormat;
use crate::output::model::{Artifact, CommandError, CommandInputs, CommandResult, SCHEMA_VERSION};

/// Human-readable rendering of a result payload.
pub trait TextOutput {
	fn write_text(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl TextOutput for () {
	fn write_text(&self, _out: &mut dyn Write) -> io::Result<()> {
		Ok(())
	}
}

/// Collects what a command knows before it runs, then closes the envelope
/// with either its payload or its error. The clock starts at `new`.
pub struct ResultBuilder {
	command: &'static str,
	inputs: Option<CommandInputs>,
	started: Instant,
}

impl ResultBuilder {
	pub fn new(command: &'static str) -> Self {
		Self {
			command,
			inputs: None,
			started: Instant::now(),
		}
	}

	pub fn inputs(mut self, inputs: CommandInputs) -> Self {
		self.inputs = Some(inputs);
		self
	}

	pub fn success<T>(self, data: T, artifacts: Vec<Artifact>, warnings: Vec<String>) -> CommandResult<T> {
		self.envelope(Some(data), None, artifacts, warnings)
	}

	pub fn failure<T>(self, error: CommandError) -> CommandResult<T> {
		self.envelope(None, Some(error), Vec::new(), Vec::new())
	}

	fn envelope<T>(self, data: Option<T>, error: Option<CommandError>, artifacts: Vec<Artifact>, warnings: Vec<String>) -> CommandResult<T> {
		CommandResult {
			schema_version: SCHEMA_VERSION,
			ok: error.is_none(),
			command: self.command.to_string(),
			inputs: self.inputs,
			data,
			error,
			duration_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
			artifacts,
			warnings,
		}
	}
}

/// Prints `result` to stdout (and stderr, in text mode).
pub fn print_result<T: Serialize + TextOutput>(result: &CommandResult<T>, format: OutputFormat) {
	let json = match format {
		OutputFormat::Text => {
			print_text(result, &mut io::stdout().lock(), &mut io::stderr().lock());
			return;
		}
		OutputFormat::Json => serde_json::to_string_pretty(result),
		OutputFormat::Ndjson => serde_json::to_string(result),
	};
	match json {
		Ok(json) => println!("{json}"),
		Err(err) => eprintln!("cannot serialize result: {err}"),
	}
}

/// Text output is best effort: a closed pipe (`webtotext ... --print | head`)
/// is logged, not reported.
pub(crate) fn print_text<T: TextOutput>(result: &CommandResult<T>, out: &mut dyn Write, err: &mut dyn Write) {
	if let Err(error) = write_result_text(result, out, err) {
		debug!(kind = ?error.kind(), %error, "could not write result text");
	}
}

/// Only the payload goes to `out`; everything else goes to `err` so printed
/// content can be piped.
pub(crate) fn write_result_text<T: TextOutput>(result: &CommandResult<T>, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
	match (&result.data, &result.error) {
		(_, Some(error)) => writeln!(err, "{} [{}]: {}", "Error".red().bold(), error.code, error.message)?,
		(Some(data), None) => data.write_text(out)?,
		(None, None) => {}
	}

	for warning in &result.warnings {
		writeln!(err, "[{}] {warning}", "warning".yellow())?;
	}
	for artifact in &result.artifacts {
		writeln!(err, "Saved {}: {}", artifact.artifact_type.label(), artifact.path.display())?;
	}
	Ok(())
}
