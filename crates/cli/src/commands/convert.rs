//! `convert`: run the pipeline over saved HTML without a browser.

use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::info;
use webtotext::RawDocument;

use crate::commands::page::{normalize_url, process_document};
use crate::commands::{Completed, finish};
use crate::config::Settings;
use crate::error::Result;
use crate::output::{CommandInputs, CommandResult, ExtractData, ResultBuilder};

pub async fn run(settings: &Settings, input: &Path, url: Option<String>) -> CommandResult<ExtractData> {
	let builder = ResultBuilder::new("convert").inputs(CommandInputs {
		file: Some(input.to_path_buf()),
		url: url.clone(),
		mode: Some(settings.mode.to_string()),
		..CommandInputs::default()
	});
	finish(builder, convert(settings, input, url).await)
}

async fn convert(settings: &Settings, input: &Path, url: Option<String>) -> Result<Completed<ExtractData>> {
	let pipeline = settings.pipeline()?;
	let url = url.as_deref().map(normalize_url).transpose()?;
	let bytes = read_input(input).await?;
	info!(target = "webtotext", file = %input.display(), bytes = bytes.len(), "convert");

	let raw = RawDocument::from_bytes(&bytes, url)?;
	process_document(settings, &pipeline, raw, None)
}

/// Reads the file, or stdin for `-`.
async fn read_input(input: &Path) -> Result<Vec<u8>> {
	if input == Path::new("-") {
		let mut bytes = Vec::new();
		tokio::io::stdin().read_to_end(&mut bytes).await?;
		return Ok(bytes);
	}
	Ok(tokio::fs::read(input).await?)
}
