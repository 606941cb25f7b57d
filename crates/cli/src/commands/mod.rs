mod convert;
mod launch;
mod page;
mod tabs;

use serde::Serialize;
use tracing::debug;
use webtotext_runtime::FetchError;

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::{Artifact, CommandError, CommandResult, OutputFormat, ResultBuilder, TextOutput, print_result};

/// What a command produced when it succeeded.
pub(crate) struct Completed<T> {
	pub data: T,
	pub artifacts: Vec<Artifact>,
	pub warnings: Vec<String>,
}

impl<T> Completed<T> {
	pub fn new(data: T) -> Self {
		Self {
			data,
			artifacts: Vec::new(),
			warnings: Vec::new(),
		}
	}
}

/// Turns a command outcome into its result envelope.
pub(crate) fn finish<T>(builder: ResultBuilder, outcome: Result<Completed<T>>) -> CommandResult<T> {
	match outcome {
		Ok(done) => builder.success(done.data, done.artifacts, done.warnings),
		Err(err) => {
			debug!(error = ?err, "command failed");
			builder.failure(command_error(&err))
		}
	}
}

fn command_error(err: &CliError) -> CommandError {
	let details = match err {
		CliError::Fetch(FetchError::Unreachable { endpoint, hint, .. }) => Some(serde_json::json!({ "endpoint": endpoint, "hint": hint })),
		_ => None,
	};
	CommandError {
		code: err.code(),
		message: err.to_string(),
		details,
	}
}

fn emit<T: Serialize + TextOutput>(result: CommandResult<T>, format: OutputFormat) -> bool {
	print_result(&result, format);
	result.ok
}

/// Runs the parsed command and prints its result. Returns whether it
/// succeeded.
pub async fn dispatch(cli: Cli) -> bool {
	let format = cli.global.format;
	let settings = match Settings::resolve(&cli.global) {
		Ok(settings) => settings,
		Err(err) => return emit::<()>(finish(ResultBuilder::new(cli.command.name()), Err(err)), format),
	};

	match cli.command {
		Commands::Extract { url } => emit(page::run_extract(&settings, &url).await, format),
		Commands::Tab { target } => emit(page::run_tab(&settings, &target).await, format),
		Commands::Tabs => emit(tabs::run_list(&settings).await, format),
		Commands::AllTabs => emit(tabs::run_all(&settings).await, format),
		Commands::Convert { input, url } => emit(convert::run(&settings, &input, url).await, format),
		Commands::Launch { user_data_dir, executable } => emit(launch::run(&settings, user_data_dir, executable).await, format),
	}
}
