//! Effective settings: flags, then `WEBTOTEXT_*` environment, then the JSON
//! config file, then defaults.
//!
//! ```json
//! {
//!   "port": 9333,
//!   "mode": "plain",
//!   "outputDir": "notes",
//!   "settleMs": 500,
//!   "patterns": { "removeSelectors": [".promo"], "classTokens": ["sponsor"] }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use webtotext::{ExtractOptions, FormatMode, PatternExtension, Patterns, Pipeline};
use webtotext_runtime::{CdpFetcher, DebugEndpoint, FetchOptions};

use crate::cli::GlobalArgs;
use crate::error::{CliError, Result};

pub const DEFAULT_OUTPUT_DIR: &str = "extracted_texts";

/// Contents of `--config FILE`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
	pub host: Option<String>,
	pub port: Option<u16>,
	pub mode: Option<FormatMode>,
	pub output_dir: Option<PathBuf>,
	pub settle_ms: Option<u64>,
	pub navigation_timeout_ms: Option<u64>,
	pub title_heading: Option<bool>,
	pub patterns: PatternExtension,
}

impl ConfigFile {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path).map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
		let config: ConfigFile = serde_json::from_str(&raw).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
		debug!(path = %path.display(), "loaded config file");
		Ok(config)
	}
}

#[derive(Debug, Clone)]
pub struct Settings {
	pub endpoint: DebugEndpoint,
	pub mode: FormatMode,
	pub output_dir: PathBuf,
	pub save: bool,
	pub print: bool,
	pub fetch: FetchOptions,
	pub extract: ExtractOptions,
	pub patterns: PatternExtension,
}

impl Settings {
	pub fn resolve(args: &GlobalArgs) -> Result<Self> {
		let file = match &args.config {
			Some(path) => ConfigFile::load(path)?,
			None => ConfigFile::default(),
		};
		Ok(Self::layer(args, file))
	}

	fn layer(args: &GlobalArgs, file: ConfigFile) -> Self {
		let defaults = DebugEndpoint::default();
		let endpoint = DebugEndpoint::new(
			args.host.clone().or(file.host).unwrap_or(defaults.host),
			args.port.or(file.port).unwrap_or(defaults.port),
		);

		let mut fetch = FetchOptions::default();
		if let Some(ms) = args.settle_ms.or(file.settle_ms) {
			fetch.settle = Duration::from_millis(ms);
		}
		if let Some(ms) = file.navigation_timeout_ms {
			fetch.navigation_timeout = Duration::from_millis(ms);
		}

		let mut extract = ExtractOptions::default();
		if let Some(title_heading) = file.title_heading {
			extract.title_heading = title_heading;
		}

		Self {
			endpoint,
			mode: args.mode.or(file.mode).unwrap_or_default(),
			output_dir: args.output_dir.clone().or(file.output_dir).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
			save: !args.no_save,
			print: args.print,
			fetch,
			extract,
			patterns: file.patterns,
		}
	}

	/// Pipeline over the built-in patterns plus the configured additions.
	pub fn pipeline(&self) -> Result<Pipeline> {
		if self.patterns.is_empty() {
			return Ok(Pipeline::new(Patterns::builtin(), self.extract)?);
		}
		Ok(Pipeline::new(&Patterns::builtin().extended(&self.patterns), self.extract)?)
	}

	pub fn fetcher(&self) -> CdpFetcher {
		CdpFetcher::new(self.endpoint.clone(), self.fetch)
	}
}
