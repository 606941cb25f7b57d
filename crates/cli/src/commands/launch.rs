//! `launch`: start a browser with remote debugging enabled.

use std::path::PathBuf;

use tracing::info;
use webtotext_runtime::{LaunchOptions, launch_browser};

use crate::commands::{Completed, finish};
use crate::config::Settings;
use crate::error::Result;
use crate::output::{CommandInputs, CommandResult, LaunchData, ResultBuilder};

pub async fn run(settings: &Settings, user_data_dir: Option<PathBuf>, executable: Option<PathBuf>) -> CommandResult<LaunchData> {
	let builder = ResultBuilder::new("launch").inputs(CommandInputs {
		endpoint: Some(format!("127.0.0.1:{}", settings.endpoint.port)),
		..CommandInputs::default()
	});
	let options = LaunchOptions {
		port: settings.endpoint.port,
		user_data_dir,
		executable,
	};
	finish(builder, launch(&options).await)
}

async fn launch(options: &LaunchOptions) -> Result<Completed<LaunchData>> {
	let browser = launch_browser(options).await?;
	info!(target = "webtotext", pid = browser.pid, endpoint = %browser.discovered.endpoint, "browser launched");

	Ok(Completed::new(LaunchData {
		pid: browser.pid,
		executable: browser.executable,
		user_data_dir: browser.user_data_dir,
		endpoint: browser.discovered.endpoint.to_string(),
		ws_endpoint: browser.discovered.version.web_socket_debugger_url,
		browser: browser.discovered.version.browser,
	}))
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;
	use crate::cli::GlobalArgs;
	use crate::output::ErrorCode;

	#[tokio::test]
	async fn missing_executable_reports_launch_failure() {
		let dir = TempDir::new().unwrap();
		let settings = Settings::resolve(&GlobalArgs {
			port: Some(9),
			..GlobalArgs::default()
		})
		.unwrap();

		let result = run(&settings, Some(dir.path().join("profile")), Some(dir.path().join("no-such-browser"))).await;
		assert!(!result.ok);
		assert_eq!(result.error.unwrap().code, ErrorCode::BrowserLaunchFailed);
	}
}
