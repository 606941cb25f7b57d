//! End-to-end runs of the `webtotext` binary on saved HTML files.
//!
//! `convert` needs no browser, so these exercise flags, config loading,
//! saving and the result envelope without network access.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use serde_json::Value;
use tempfile::TempDir;

const ARTICLE: &str = r#"<!doctype html>
<html><head><title>Field Guide</title></head>
<body>
	<nav><a href="/">Home</a> <a href="/guides">Guides</a></nav>
	<div class="cookie-banner">We use cookies. <button>Accept</button></div>
	<main>
		<h1>Field Guide</h1>
		<p>Pack light, start early and keep an eye on the weather when you head up into the hills.</p>
		<h2>Checklist</h2>
		<ul><li>Water</li><li>Map</li></ul>
		<aside class="promo">Buy our premium boots today</aside>
		<div class="promo">Limited offer on tents this week only</div>
	</main>
	<footer>Copyright 2024</footer>
</body></html>"#;

fn webtotext_binary() -> PathBuf {
	let mut path = std::env::current_exe().expect("current_exe should resolve");
	path.pop();
	path.pop();
	path.push("webtotext");
	path
}

fn run(args: &[&str], cwd: &Path) -> Result<(bool, String, String)> {
	let output = Command::new(webtotext_binary())
		.args(args)
		.current_dir(cwd)
		.env_remove("WEBTOTEXT_HOST")
		.env_remove("WEBTOTEXT_PORT")
		.env_remove("WEBTOTEXT_MODE")
		.env_remove("WEBTOTEXT_OUTPUT_DIR")
		.env_remove("WEBTOTEXT_CONFIG")
		.env_remove("RUST_LOG")
		.output()?;
	Ok((
		output.status.success(),
		String::from_utf8_lossy(&output.stdout).into_owned(),
		String::from_utf8_lossy(&output.stderr).into_owned(),
	))
}

fn parse_json(stdout: &str, stderr: &str) -> Value {
	serde_json::from_str(stdout).unwrap_or_else(|err| panic!("expected JSON on stdout: {err}\nstdout:\n{stdout}\nstderr:\n{stderr}"))
}

fn write_article(dir: &TempDir) -> Result<PathBuf> {
	let path = dir.path().join("guide.html");
	std::fs::write(&path, ARTICLE)?;
	Ok(path)
}

#[test]
fn convert_saves_markdown_and_reports_artifact() -> Result<()> {
	let dir = TempDir::new()?;
	let input = write_article(&dir)?;
	let input = input.to_string_lossy();

	let (success, stdout, stderr) = run(&["-f", "json", "convert", &input, "--url", "https://www.example.com/guides/field"], dir.path())?;
	assert!(success, "convert failed: {stderr}");
	let json = parse_json(&stdout, &stderr);

	assert_eq!(json["ok"], Value::Bool(true));
	assert_eq!(json["command"], "convert");
	assert_eq!(json["data"]["family"], "generic");
	assert_eq!(json["data"]["mode"], "markdown");
	assert_eq!(json["artifacts"][0]["type"], "markdown");

	let saved = PathBuf::from(json["data"]["path"].as_str().expect("path should be a string"));
	let saved = if saved.is_absolute() { saved } else { dir.path().join(saved) };
	assert!(saved.starts_with(dir.path().join("extracted_texts")), "{}", saved.display());
	let name = saved.file_name().unwrap().to_string_lossy().into_owned();
	assert!(name.starts_with("example.com_guides_field_"), "{name}");

	let text = std::fs::read_to_string(&saved)?;
	assert!(text.starts_with("# Field Guide\n\nPack light"), "{text}");
	assert!(text.contains("## Checklist"), "{text}");
	assert!(text.contains("- Water\n- Map"), "{text}");
	assert!(!text.contains("Home"), "{text}");
	assert!(!text.contains("cookies"), "{text}");
	assert!(!text.contains("Copyright"), "{text}");
	Ok(())
}

#[test]
fn print_without_save_writes_plain_text_to_stdout() -> Result<()> {
	let dir = TempDir::new()?;
	let input = write_article(&dir)?;
	let input = input.to_string_lossy();

	let (success, stdout, stderr) = run(&["convert", &input, "-m", "plain", "--no-save", "--print"], dir.path())?;
	assert!(success, "convert failed: {stderr}");
	assert!(stdout.starts_with("Field Guide\n\nPack light"), "{stdout}");
	assert!(stdout.contains("Checklist\n\n"), "{stdout}");
	assert!(!stdout.contains('#'), "{stdout}");
	assert!(!dir.path().join("extracted_texts").exists());
	Ok(())
}

#[test]
fn config_file_adds_removal_patterns() -> Result<()> {
	let dir = TempDir::new()?;
	let input = write_article(&dir)?;
	let input = input.to_string_lossy();
	let config = dir.path().join("webtotext.json");
	std::fs::write(&config, r#"{"mode": "plain", "outputDir": "notes", "patterns": {"removeSelectors": [".promo"]}}"#)?;
	let config = config.to_string_lossy();

	let (success, stdout, stderr) = run(&["-f", "json", "--config", &config, "convert", &input, "--print"], dir.path())?;
	assert!(success, "convert failed: {stderr}");
	let json = parse_json(&stdout, &stderr);

	let content = json["data"]["content"].as_str().expect("content should be a string");
	assert!(content.contains("Pack light"), "{content}");
	assert!(!content.contains("tents"), "{content}");
	assert_eq!(json["data"]["mode"], "plain");

	let saved = json["data"]["path"].as_str().expect("path should be a string");
	assert!(saved.ends_with(".txt"), "{saved}");
	assert!(dir.path().join("notes").is_dir());
	Ok(())
}

#[test]
fn bad_config_is_reported_in_the_envelope() -> Result<()> {
	let dir = TempDir::new()?;
	let input = write_article(&dir)?;
	let input = input.to_string_lossy();
	let config = dir.path().join("broken.json");
	std::fs::write(&config, r#"{"patterns": {"removeSelectors": ["div["]}}"#)?;
	let config = config.to_string_lossy();

	let (success, stdout, stderr) = run(&["-f", "json", "--config", &config, "convert", &input], dir.path())?;
	assert!(!success);
	let json = parse_json(&stdout, &stderr);
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["error"]["code"], "INVALID_PATTERN");
	Ok(())
}

#[test]
fn missing_input_file_fails_with_io_error() -> Result<()> {
	let dir = TempDir::new()?;
	let (success, stdout, stderr) = run(&["-f", "json", "convert", "does-not-exist.html"], dir.path())?;
	assert!(!success);
	let json = parse_json(&stdout, &stderr);
	assert_eq!(json["error"]["code"], "IO_ERROR");
	Ok(())
}

#[test]
fn text_mode_errors_go_to_stderr() -> Result<()> {
	let dir = TempDir::new()?;
	let (success, stdout, stderr) = run(&["convert", "does-not-exist.html"], dir.path())?;
	assert!(!success);
	assert!(stdout.is_empty(), "{stdout}");
	assert!(stderr.contains("IO_ERROR"), "{stderr}");
	Ok(())
}
