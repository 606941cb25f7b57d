//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count. `RUST_LOG` overrides it.
pub(crate) fn default_directive(verbose: u8) -> &'static str {
	match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	}
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose > 1)
		.try_init();
}
