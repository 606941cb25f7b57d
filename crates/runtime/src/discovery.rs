//! HTTP side of the debugging endpoint: `/json/version`, `/json/list`, `/json/new`.

use std::time::Duration;

use tracing::debug;
use webtotext_protocol::{TargetInfo, VersionInfo};

use crate::endpoint::DebugEndpoint;
use crate::error::{FetchError, Result};

const PROBE_TIMEOUT: Duration = Duration::from_millis(400);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// An endpoint that answered, with what it said about itself.
#[derive(Debug, Clone)]
pub struct Discovered {
	pub endpoint: DebugEndpoint,
	pub version: VersionInfo,
}

fn client(timeout: Duration) -> Result<reqwest::Client> {
	reqwest::Client::builder()
		.timeout(timeout)
		.build()
		.map_err(|e| FetchError::Http(format!("failed to create HTTP client: {e}")))
}

/// Queries `/json/version` on `endpoint` and, for loopback hosts, its other
/// loopback spellings. Returns the first that answers.
pub async fn fetch_version(endpoint: &DebugEndpoint) -> Result<Discovered> {
	let client = client(PROBE_TIMEOUT)?;
	let mut last_error = "no response".to_string();

	for candidate in endpoint.candidates() {
		let response = match client.get(candidate.url("/json/version")).send().await {
			Ok(r) => r,
			Err(e) => {
				last_error = e.to_string();
				continue;
			}
		};

		if !response.status().is_success() {
			last_error = format!("unexpected status {}", response.status());
			continue;
		}

		let version: VersionInfo = response
			.json()
			.await
			.map_err(|e| FetchError::Http(format!("failed to parse /json/version from {candidate}: {e}")))?;
		debug!(endpoint = %candidate, browser = ?version.browser, "debug endpoint answered");
		return Ok(Discovered { endpoint: candidate, version });
	}

	Err(FetchError::Unreachable {
		endpoint: endpoint.to_string(),
		reason: last_error,
		hint: launch_hint(endpoint.port),
	})
}

/// Command line that starts a browser this tool can talk to.
pub fn launch_hint(port: u16) -> String {
	let browser = if cfg!(target_os = "windows") {
		"msedge.exe"
	} else if cfg!(target_os = "macos") {
		"\"/Applications/Google Chrome.app/Contents/MacOS/Google Chrome\""
	} else {
		"google-chrome"
	};
	format!("{browser} --remote-debugging-port={port} --remote-allow-origins=* (or: webtotext launch --port {port})")
}

/// Every target the browser reports, pages and otherwise.
pub async fn list_targets(endpoint: &DebugEndpoint) -> Result<Vec<TargetInfo>> {
	let response = client(REQUEST_TIMEOUT)?.get(endpoint.url("/json/list")).send().await?;
	if !response.status().is_success() {
		return Err(FetchError::Http(format!("/json/list returned {}", response.status())));
	}
	Ok(response.json().await?)
}

/// The page targets, in the browser's order.
pub async fn list_pages(endpoint: &DebugEndpoint) -> Result<Vec<TargetInfo>> {
	Ok(list_targets(endpoint).await?.into_iter().filter(TargetInfo::is_page).collect())
}

/// Opens a blank tab. Current browsers want `PUT /json/new`; older ones only
/// accept `GET`.
pub async fn open_page(endpoint: &DebugEndpoint) -> Result<TargetInfo> {
	let client = client(REQUEST_TIMEOUT)?;
	let url = endpoint.url("/json/new");

	let mut response = client.put(&url).send().await?;
	if !response.status().is_success() {
		debug!(status = %response.status(), "PUT /json/new rejected, retrying with GET");
		response = client.get(&url).send().await?;
	}
	if !response.status().is_success() {
		return Err(FetchError::Http(format!("/json/new returned {}", response.status())));
	}

	let target: TargetInfo = response.json().await?;
	debug!(id = %target.id, "opened new tab");
	Ok(target)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hint_names_the_port() {
		let hint = launch_hint(9333);
		assert!(hint.contains("--remote-debugging-port=9333"));
		assert!(hint.contains("--remote-allow-origins=*"));
	}

	#[tokio::test]
	async fn closed_port_is_unreachable() {
		let port = {
			let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
			listener.local_addr().unwrap().port()
		};
		let err = fetch_version(&DebugEndpoint::new("127.0.0.1", port)).await.unwrap_err();
		match err {
			FetchError::Unreachable { endpoint, hint, .. } => {
				assert_eq!(endpoint, format!("127.0.0.1:{port}"));
				assert!(hint.contains(&port.to_string()));
			}
			other => panic!("expected Unreachable, got {other:?}"),
		}
	}
}
