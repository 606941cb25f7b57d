//! HTTP discovery documents served by the debugging endpoint.

use serde::{Deserialize, Serialize};

/// `/json/version` response subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
	#[serde(rename = "webSocketDebuggerUrl")]
	pub web_socket_debugger_url: String,
	#[serde(rename = "Browser", default)]
	pub browser: Option<String>,
	#[serde(rename = "Protocol-Version", default)]
	pub protocol_version: Option<String>,
}

/// One entry of the `/json/list` (or `/json/new`) response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
	pub id: String,
	#[serde(rename = "type")]
	pub target_type: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	/// Absent when another client is already attached to the target.
	#[serde(default)]
	pub web_socket_debugger_url: Option<String>,
}

impl TargetInfo {
	/// Regular browser tab, as opposed to service workers, extensions or devtools.
	pub fn is_page(&self) -> bool {
		self.target_type == "page"
	}

	/// Page tab that still accepts a websocket attachment.
	pub fn is_attachable_page(&self) -> bool {
		self.is_page() && self.web_socket_debugger_url.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_target_list_entry() {
		let json = r#"{
			"description": "",
			"devtoolsFrontendUrl": "/devtools/inspector.html?ws=localhost:9222/devtools/page/ABC",
			"id": "ABC",
			"title": "Example Domain",
			"type": "page",
			"url": "https://example.com/",
			"webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/ABC"
		}"#;
		let target: TargetInfo = serde_json::from_str(json).unwrap();
		assert_eq!(target.id, "ABC");
		assert!(target.is_attachable_page());
		assert_eq!(target.web_socket_debugger_url.as_deref(), Some("ws://localhost:9222/devtools/page/ABC"));
	}

	#[test]
	fn attached_targets_are_not_attachable() {
		let json = r#"{"id": "X", "type": "page", "title": "t", "url": "about:blank"}"#;
		let target: TargetInfo = serde_json::from_str(json).unwrap();
		assert!(target.is_page());
		assert!(!target.is_attachable_page());
	}

	#[test]
	fn parses_version_info() {
		let json = r#"{
			"Browser": "Chrome/126.0.6478.126",
			"Protocol-Version": "1.3",
			"webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/xyz"
		}"#;
		let info: VersionInfo = serde_json::from_str(json).unwrap();
		assert_eq!(info.browser.as_deref(), Some("Chrome/126.0.6478.126"));
		assert_eq!(info.protocol_version.as_deref(), Some("1.3"));
	}
}
