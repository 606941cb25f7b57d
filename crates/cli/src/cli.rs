use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use webtotext::FormatMode;
use webtotext_runtime::TabSelector;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "webtotext")]
#[command(about = "Readable text from pages open in a debuggable Chrome/Chromium browser")]
#[command(version)]
pub struct Cli {
	#[command(flatten)]
	pub global: GlobalArgs,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Result output: human-readable text or a JSON envelope
	#[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Remote debugging host
	#[arg(long, global = true, env = "WEBTOTEXT_HOST")]
	pub host: Option<String>,

	/// Remote debugging port
	#[arg(long, global = true, env = "WEBTOTEXT_PORT")]
	pub port: Option<u16>,

	/// Text flavour of the extracted content: markdown or plain
	#[arg(short, long, global = true, env = "WEBTOTEXT_MODE")]
	pub mode: Option<FormatMode>,

	/// Directory extracted files are written to [default: extracted_texts]
	#[arg(short, long, global = true, env = "WEBTOTEXT_OUTPUT_DIR", value_name = "DIR")]
	pub output_dir: Option<PathBuf>,

	/// Do not write the extracted text to a file
	#[arg(long, global = true)]
	pub no_save: bool,

	/// Include the extracted text in the command output
	#[arg(long, global = true)]
	pub print: bool,

	/// Pause after page load before reading the DOM, in milliseconds
	#[arg(long, global = true, value_name = "MS")]
	pub settle_ms: Option<u64>,

	/// JSON configuration file
	#[arg(long, global = true, env = "WEBTOTEXT_CONFIG", value_name = "FILE")]
	pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Navigate a tab to URL and extract its text
	#[command(alias = "x")]
	Extract {
		/// Page to open; https:// is assumed when no scheme is given
		url: String,
	},

	/// Extract an already-open tab
	Tab {
		/// Tab index (see `tabs`), `id:<target-id>`, or a url/title substring
		target: TabSelector,
	},

	/// List open page tabs
	#[command(alias = "ls")]
	Tabs,

	/// Extract every open tab into one combined file
	AllTabs,

	/// Run the extraction on a local HTML file (`-` for stdin)
	Convert {
		input: PathBuf,
		/// Source URL, used for naming the output file
		#[arg(long)]
		url: Option<String>,
	},

	/// Start a browser with remote debugging enabled
	Launch {
		/// Browser profile directory [default: ~/.chrome_automation]
		#[arg(long, value_name = "DIR")]
		user_data_dir: Option<PathBuf>,
		/// Browser binary to run instead of searching for one
		#[arg(long, value_name = "PATH")]
		executable: Option<PathBuf>,
	},
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Extract { .. } => "extract",
			Commands::Tab { .. } => "tab",
			Commands::Tabs => "tabs",
			Commands::AllTabs => "all-tabs",
			Commands::Convert { .. } => "convert",
			Commands::Launch { .. } => "launch",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_extract_command() {
		let cli = Cli::try_parse_from(["webtotext", "extract", "example.com/docs"]).unwrap();
		match cli.command {
			Commands::Extract { url } => assert_eq!(url, "example.com/docs"),
			_ => panic!("Expected Extract command"),
		}
		assert_eq!(cli.global.format, OutputFormat::Text);
		assert!(!cli.global.no_save);
	}

	#[test]
	fn parse_tab_selectors() {
		let cli = Cli::try_parse_from(["webtotext", "tab", "2"]).unwrap();
		match cli.command {
			Commands::Tab { target } => assert_eq!(target, TabSelector::Index(2)),
			_ => panic!("Expected Tab command"),
		}

		let cli = Cli::try_parse_from(["webtotext", "tab", "wiki.example"]).unwrap();
		match cli.command {
			Commands::Tab { target } => assert_eq!(target, TabSelector::Pattern("wiki.example".into())),
			_ => panic!("Expected Tab command"),
		}
	}

	#[test]
	fn global_flags_after_subcommand() {
		let cli = Cli::try_parse_from([
			"webtotext", "convert", "page.html", "--url", "https://example.com/a", "-m", "plain", "-o", "/tmp/out", "--no-save", "--print", "-f",
			"json",
		])
		.unwrap();
		assert_eq!(cli.global.mode, Some(FormatMode::Plain));
		assert_eq!(cli.global.output_dir, Some(PathBuf::from("/tmp/out")));
		assert!(cli.global.no_save);
		assert!(cli.global.print);
		assert_eq!(cli.global.format, OutputFormat::Json);
		match cli.command {
			Commands::Convert { input, url } => {
				assert_eq!(input, PathBuf::from("page.html"));
				assert_eq!(url.as_deref(), Some("https://example.com/a"));
			}
			_ => panic!("Expected Convert command"),
		}
	}

	#[test]
	fn verbose_flag_short_and_long() {
		let cli = Cli::try_parse_from(["webtotext", "-v", "tabs"]).unwrap();
		assert_eq!(cli.global.verbose, 1);

		let cli = Cli::try_parse_from(["webtotext", "--verbose", "tabs"]).unwrap();
		assert_eq!(cli.global.verbose, 1);

		let cli = Cli::try_parse_from(["webtotext", "-vv", "all-tabs"]).unwrap();
		assert_eq!(cli.global.verbose, 2);
	}

	#[test]
	fn invalid_mode_and_command_fail() {
		assert!(Cli::try_parse_from(["webtotext", "-m", "html", "tabs"]).is_err());
		assert!(Cli::try_parse_from(["webtotext", "unknown-command"]).is_err());
		assert!(Cli::try_parse_from(["webtotext", "--port", "99999", "tabs"]).is_err());
	}
}
