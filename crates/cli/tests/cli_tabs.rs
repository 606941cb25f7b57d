//! `tabs` against a fake discovery endpoint and against a dead port.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::Result;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

fn webtotext_binary() -> PathBuf {
	let mut path = std::env::current_exe().expect("current_exe should resolve");
	path.pop();
	path.pop();
	path.push("webtotext");
	path
}

async fn run(args: Vec<String>) -> Result<Output> {
	let output = tokio::task::spawn_blocking(move || {
		Command::new(webtotext_binary())
			.args(&args)
			.env_remove("WEBTOTEXT_HOST")
			.env_remove("WEBTOTEXT_PORT")
			.env_remove("WEBTOTEXT_CONFIG")
			.env_remove("RUST_LOG")
			.output()
	})
	.await??;
	Ok(output)
}

async fn discovery_server() -> Result<SocketAddr> {
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let addr = listener.local_addr()?;
	let list = json!([
		{
			"id": "A1",
			"type": "page",
			"title": "Release notes",
			"url": "https://docs.example.com/releases",
			"webSocketDebuggerUrl": format!("ws://{addr}/devtools/page/A1"),
		},
		{
			"id": "W1",
			"type": "service_worker",
			"title": "worker",
			"url": "https://docs.example.com/sw.js",
		},
		{
			"id": "B2",
			"type": "page",
			"title": "Inbox",
			"url": "https://mail.example.com/",
		},
	]);
	let version = json!({
		"Browser": "FakeChrome/1.0",
		"webSocketDebuggerUrl": format!("ws://{addr}/devtools/browser/B"),
	});
	let app = Router::new()
		.route("/json/version", get(move || async move { Json(version) }))
		.route("/json/list", get(move || async move { Json(list) }));
	tokio::spawn(async move {
		let _ = axum::serve(listener, app).await;
	});
	Ok(addr)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tabs_lists_pages_only() -> Result<()> {
	let addr = discovery_server().await?;
	let output = run(vec![
		"-f".into(),
		"json".into(),
		"--host".into(),
		"127.0.0.1".into(),
		"--port".into(),
		addr.port().to_string(),
		"tabs".into(),
	])
	.await?;

	let stdout = String::from_utf8_lossy(&output.stdout);
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(output.status.success(), "tabs failed: {stderr}");
	let json: Value = serde_json::from_str(&stdout)?;

	assert_eq!(json["data"]["count"], 2);
	let tabs = json["data"]["tabs"].as_array().expect("tabs should be an array");
	assert_eq!(tabs[0]["id"], "A1");
	assert_eq!(tabs[0]["attachable"], true);
	assert_eq!(tabs[1]["id"], "B2");
	assert_eq!(tabs[1]["index"], 1);
	assert_eq!(tabs[1]["attachable"], false);
	Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_browser_fails_with_a_launch_hint() -> Result<()> {
	let port = {
		let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
		listener.local_addr()?.port()
	};
	let output = run(vec![
		"-f".into(),
		"json".into(),
		"--host".into(),
		"127.0.0.1".into(),
		"--port".into(),
		port.to_string(),
		"tabs".into(),
	])
	.await?;

	assert_eq!(output.status.code(), Some(1));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "BROWSER_UNREACHABLE");
	let hint = json["error"]["details"]["hint"].as_str().expect("hint should be a string");
	assert!(hint.contains(&format!("--remote-debugging-port={port}")), "{hint}");
	Ok(())
}
