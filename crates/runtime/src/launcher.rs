//! Starting a Chromium-family browser with remote debugging enabled.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::{debug, info};

use crate::discovery::{Discovered, fetch_version};
use crate::endpoint::DebugEndpoint;
use crate::error::{FetchError, Result};

const POLL_ATTEMPTS: u32 = 15;
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Profile directory used when none is given: `~/.chrome_automation`.
pub fn default_user_data_dir() -> Option<PathBuf> {
	dirs::home_dir().map(|home| home.join(".chrome_automation"))
}

#[derive(Debug, Clone)]
pub struct LaunchOptions {
	pub port: u16,
	pub user_data_dir: Option<PathBuf>,
	/// Skip the lookup and run this binary.
	pub executable: Option<PathBuf>,
}

impl Default for LaunchOptions {
	fn default() -> Self {
		Self {
			port: crate::endpoint::DEFAULT_PORT,
			user_data_dir: None,
			executable: None,
		}
	}
}

/// A browser this process started.
#[derive(Debug, Clone)]
pub struct LaunchedBrowser {
	pub pid: u32,
	pub executable: PathBuf,
	pub user_data_dir: PathBuf,
	pub discovered: Discovered,
}

/// Finds a browser, starts it detached with debugging on `options.port`, and
/// waits until `/json/version` answers.
pub async fn launch_browser(options: &LaunchOptions) -> Result<LaunchedBrowser> {
	let executable = match &options.executable {
		Some(path) => path.clone(),
		None => find_browser_executable().ok_or(FetchError::BrowserNotFound)?,
	};
	let user_data_dir = options
		.user_data_dir
		.clone()
		.or_else(default_user_data_dir)
		.ok_or_else(|| FetchError::Launch("no home directory for the default --user-data-dir; pass one explicitly".into()))?;
	std::fs::create_dir_all(&user_data_dir).map_err(|e| FetchError::Launch(format!("cannot create {}: {e}", user_data_dir.display())))?;

	let mut cmd = Command::new(&executable);
	cmd.args(launch_args(options.port, &user_data_dir))
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null());

	#[cfg(unix)]
	std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

	let mut child = cmd
		.spawn()
		.map_err(|e| FetchError::Launch(format!("failed to start {}: {e}", executable.display())))?;
	let pid = child.id();
	info!(pid, executable = %executable.display(), port = options.port, "browser started");

	let endpoint = DebugEndpoint::new("127.0.0.1", options.port);
	let mut last_error = "endpoint not reachable".to_string();
	for attempt in 1..=POLL_ATTEMPTS {
		tokio::time::sleep(POLL_INTERVAL).await;

		if let Ok(Some(status)) = child.try_wait() {
			return Err(FetchError::Launch(format!(
				"browser exited before the debugging endpoint came up ({status}); \
				 another instance may already own the profile at {}",
				user_data_dir.display()
			)));
		}

		match fetch_version(&endpoint).await {
			Ok(discovered) => {
				return Ok(LaunchedBrowser {
					pid,
					executable,
					user_data_dir,
					discovered,
				});
			}
			Err(e) => {
				debug!(attempt, error = %e, "debugging endpoint not up yet");
				last_error = match e {
					FetchError::Unreachable { reason, .. } => reason,
					other => other.to_string(),
				};
			}
		}
	}

	Err(FetchError::Launch(format!(
		"browser started but port {} never answered: {last_error}",
		options.port
	)))
}

pub(crate) fn launch_args(port: u16, user_data_dir: &Path) -> Vec<String> {
	vec![
		format!("--remote-debugging-port={port}"),
		"--remote-allow-origins=*".to_string(),
		"--no-first-run".to_string(),
		"--no-default-browser-check".to_string(),
		format!("--user-data-dir={}", user_data_dir.display()),
	]
}

/// First installed Chrome, Chromium, Brave or Edge.
pub fn find_browser_executable() -> Option<PathBuf> {
	let candidates: Vec<String> = if cfg!(target_os = "macos") {
		[
			"/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
			"/Applications/Chromium.app/Contents/MacOS/Chromium",
			"/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
			"/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
		]
		.into_iter()
		.map(str::to_string)
		.collect()
	} else if cfg!(target_os = "windows") {
		windows_candidates()
	} else {
		[
			"google-chrome-stable",
			"google-chrome",
			"chromium-browser",
			"chromium",
			"brave-browser",
			"brave",
			"microsoft-edge",
			"/usr/bin/google-chrome-stable",
			"/usr/bin/google-chrome",
			"/usr/bin/chromium-browser",
			"/usr/bin/chromium",
			"/snap/bin/chromium",
		]
		.into_iter()
		.map(str::to_string)
		.collect()
	};

	candidates.into_iter().find_map(|candidate| {
		if candidate.starts_with('/') || candidate.contains('\\') || candidate.contains(':') {
			let path = PathBuf::from(candidate);
			path.exists().then_some(path)
		} else {
			which::which(&candidate).ok()
		}
	})
}

fn windows_candidates() -> Vec<String> {
	let mut roots: Vec<PathBuf> = ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"]
		.into_iter()
		.filter_map(|key| std::env::var_os(key).map(PathBuf::from))
		.collect();
	if roots.is_empty() {
		roots.push(PathBuf::from(r"C:\Program Files"));
		roots.push(PathBuf::from(r"C:\Program Files (x86)"));
	}

	let suffixes: &[&[&str]] = &[
		&["Google", "Chrome", "Application", "chrome.exe"],
		&["Microsoft", "Edge", "Application", "msedge.exe"],
		&["BraveSoftware", "Brave-Browser", "Application", "brave.exe"],
		&["Chromium", "Application", "chrome.exe"],
	];

	let mut candidates: Vec<String> = roots
		.iter()
		.flat_map(|root| suffixes.iter().map(move |suffix| suffix.iter().fold(root.clone(), |path, part| path.join(part))))
		.map(|path| path.to_string_lossy().into_owned())
		.collect();
	candidates.extend(["chrome.exe", "msedge.exe", "brave.exe", "chromium.exe"].map(str::to_string));
	candidates
}
