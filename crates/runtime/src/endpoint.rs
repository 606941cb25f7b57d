//! Address of a browser's remote debugging endpoint.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9222;

/// Host and port the browser was started with (`--remote-debugging-port`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DebugEndpoint {
	pub host: String,
	pub port: u16,
}

impl DebugEndpoint {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port }
	}

	/// `http://host:port` with IPv6 literals bracketed.
	pub fn http_base(&self) -> String {
		let host = self.host.trim_start_matches('[').trim_end_matches(']');
		if host.parse::<IpAddr>().is_ok_and(|ip| ip.is_ipv6()) {
			format!("http://[{host}]:{}", self.port)
		} else {
			format!("http://{host}:{}", self.port)
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.http_base(), path)
	}

	pub fn is_loopback(&self) -> bool {
		let host = self.host.trim_start_matches('[').trim_end_matches(']');
		host.eq_ignore_ascii_case("localhost") || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
	}

	/// This endpoint, then the other loopback spellings of it.
	pub(crate) fn candidates(&self) -> Vec<DebugEndpoint> {
		let mut out = vec![self.clone()];
		if self.is_loopback() {
			for host in ["127.0.0.1", "localhost", "::1"] {
				let alternate = DebugEndpoint::new(host, self.port);
				if alternate.http_base() != self.http_base() {
					out.push(alternate);
				}
			}
		}
		out
	}
}

impl Default for DebugEndpoint {
	fn default() -> Self {
		Self::new(DEFAULT_HOST, DEFAULT_PORT)
	}
}

impl fmt::Display for DebugEndpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let base = self.http_base();
		f.write_str(base.trim_start_matches("http://"))
	}
}

/// Parses `host:port`, `[v6]:port`, a bare port, or an `http://` base URL.
impl FromStr for DebugEndpoint {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if let Ok(port) = s.parse::<u16>() {
			return Ok(Self::new(DEFAULT_HOST, port));
		}

		let with_scheme = if s.contains("://") { s.to_string() } else { format!("http://{s}") };
		let parsed = url::Url::parse(&with_scheme).map_err(|e| format!("invalid endpoint {s:?}: {e}"))?;
		let host = parsed.host_str().ok_or_else(|| format!("invalid endpoint {s:?}: missing host"))?;
		let host = host.trim_start_matches('[').trim_end_matches(']');
		Ok(Self::new(host, parsed.port().unwrap_or(DEFAULT_PORT)))
	}
}
