//! Getting the rendered markup of a page out of the browser.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use webtotext_protocol::{EvaluateParams, EvaluateResult, NavigateParams, NavigateResult, TargetInfo};

use crate::connection::{CdpConnection, wait_for_event};
use crate::discovery::{Discovered, fetch_version, list_pages, open_page};
use crate::endpoint::DebugEndpoint;
use crate::error::{FetchError, Result};

const SNAPSHOT_SCRIPT: &str = "({ html: document.documentElement ? document.documentElement.outerHTML : '', url: location.href, title: document.title })";

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
	/// Navigate a tab to this URL first.
	Url(String),
	/// Read a tab as it is.
	Tab(TabSelector),
}

/// Which open tab to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabSelector {
	/// Zero-based position among the page tabs.
	Index(usize),
	/// Exact target id.
	Id(String),
	/// Case-insensitive substring of the tab's url or title.
	Pattern(String),
}

impl TabSelector {
	pub fn resolve<'a>(&self, pages: &'a [TargetInfo]) -> Result<&'a TargetInfo> {
		let found = match self {
			TabSelector::Index(index) => pages.get(*index),
			TabSelector::Id(id) => pages.iter().find(|page| page.id == *id),
			TabSelector::Pattern(pattern) => {
				let needle = pattern.to_lowercase();
				pages.iter().find(|page| page.id == *pattern).or_else(|| {
					pages
						.iter()
						.find(|page| page.url.to_lowercase().contains(&needle) || page.title.to_lowercase().contains(&needle))
				})
			}
		};
		found.ok_or_else(|| FetchError::TabNotFound(self.to_string()))
	}
}

/// A number selects by index, `id:` by target id, anything else is a pattern.
impl FromStr for TabSelector {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() {
			return Err("tab selector is empty".to_string());
		}
		if let Ok(index) = s.parse::<usize>() {
			return Ok(TabSelector::Index(index));
		}
		if let Some(id) = s.strip_prefix("id:") {
			return Ok(TabSelector::Id(id.to_string()));
		}
		Ok(TabSelector::Pattern(s.to_string()))
	}
}

impl fmt::Display for TabSelector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TabSelector::Index(index) => write!(f, "tab #{index}"),
			TabSelector::Id(id) => write!(f, "id:{id}"),
			TabSelector::Pattern(pattern) => f.write_str(pattern),
		}
	}
}

/// Markup and location of a page at the moment it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
	pub html: String,
	pub url: String,
	#[serde(default)]
	pub title: String,
}

/// An open page tab as listed by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
	pub index: usize,
	pub id: String,
	pub title: String,
	pub url: String,
	/// False when another debugger holds the tab.
	pub attachable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
	/// Pause after the load event so scripts can finish rendering.
	pub settle: Duration,
	/// Upper bound on waiting for `Page.loadEventFired`.
	pub navigation_timeout: Duration,
	/// Upper bound on any single CDP call.
	pub call_timeout: Duration,
}

impl Default for FetchOptions {
	fn default() -> Self {
		Self {
			settle: Duration::from_millis(2000),
			navigation_timeout: Duration::from_secs(30),
			call_timeout: Duration::from_secs(30),
		}
	}
}

/// Anything that can hand out page markup.
#[async_trait]
pub trait PageSource: Send + Sync {
	async fn fetch(&self, target: &Target) -> Result<RawPage>;

	async fn list_tabs(&self) -> Result<Vec<TabInfo>>;
}

/// [`PageSource`] backed by a browser's remote debugging endpoint. Holds no
/// connection: every call discovers the endpoint and opens its own websocket.
#[derive(Debug, Clone)]
pub struct CdpFetcher {
	endpoint: DebugEndpoint,
	options: FetchOptions,
}

impl CdpFetcher {
	pub fn new(endpoint: DebugEndpoint, options: FetchOptions) -> Self {
		Self { endpoint, options }
	}

	pub fn endpoint(&self) -> &DebugEndpoint {
		&self.endpoint
	}

	pub fn options(&self) -> &FetchOptions {
		&self.options
	}

	/// Probes the endpoint; fails with the launch hint when nothing answers.
	pub async fn discover(&self) -> Result<Discovered> {
		fetch_version(&self.endpoint).await
	}

	async fn connect(&self, target: &TargetInfo) -> Result<CdpConnection> {
		let ws_url = target
			.web_socket_debugger_url
			.as_deref()
			.ok_or_else(|| FetchError::WebSocket(format!("tab {} is already attached to another debugger", target.id)))?;
		CdpConnection::connect(ws_url, self.options.call_timeout).await
	}

	async fn fetch_url(&self, endpoint: &DebugEndpoint, url: &str) -> Result<RawPage> {
		let pages = list_pages(endpoint).await?;
		let target = match pages.into_iter().find(TargetInfo::is_attachable_page) {
			Some(target) => target,
			None => open_page(endpoint).await?,
		};
		debug!(tab = %target.id, "navigating tab");

		let conn = self.connect(&target).await?;
		conn.call("Page.enable", Value::Null).await?;

		let mut events = conn.subscribe();
		let navigated: NavigateResult = conn.call_as("Page.navigate", &NavigateParams { url: url.to_string() }).await?;
		if let Some(reason) = navigated.error_text.filter(|text| !text.is_empty()) {
			return Err(FetchError::Navigation {
				url: url.to_string(),
				reason,
			});
		}

		wait_for_event(&mut events, "Page.loadEventFired", self.options.navigation_timeout)
			.await
			.map_err(|e| match e {
				FetchError::Timeout { ms, .. } => FetchError::Navigation {
					url: url.to_string(),
					reason: format!("page did not finish loading within {ms}ms"),
				},
				other => other,
			})?;
		info!(%url, "page loaded");

		tokio::time::sleep(self.options.settle).await;
		snapshot(&conn).await
	}

	async fn fetch_tab(&self, endpoint: &DebugEndpoint, selector: &TabSelector) -> Result<RawPage> {
		let pages = list_pages(endpoint).await?;
		if pages.is_empty() {
			return Err(FetchError::NoTabs);
		}
		let target = selector.resolve(&pages)?;
		info!(tab = %target.id, url = %target.url, "reading tab");

		let conn = self.connect(target).await?;
		snapshot(&conn).await
	}
}

#[async_trait]
impl PageSource for CdpFetcher {
	async fn fetch(&self, target: &Target) -> Result<RawPage> {
		let Discovered { endpoint, .. } = self.discover().await?;
		match target {
			Target::Url(url) => self.fetch_url(&endpoint, url).await,
			Target::Tab(selector) => self.fetch_tab(&endpoint, selector).await,
		}
	}

	async fn list_tabs(&self) -> Result<Vec<TabInfo>> {
		let Discovered { endpoint, .. } = self.discover().await?;
		let pages = list_pages(&endpoint).await?;
		Ok(pages
			.into_iter()
			.enumerate()
			.map(|(index, page)| TabInfo {
				index,
				attachable: page.is_attachable_page(),
				id: page.id,
				title: page.title,
				url: page.url,
			})
			.collect())
	}
}

/// Reads markup, url and title from the page in one evaluation.
async fn snapshot(conn: &CdpConnection) -> Result<RawPage> {
	let evaluated: EvaluateResult = conn.call_as("Runtime.evaluate", &EvaluateParams::by_value(SNAPSHOT_SCRIPT)).await?;
	if let Some(details) = evaluated.exception_details {
		return Err(FetchError::Evaluation(details.message()));
	}
	let value = evaluated
		.result
		.value
		.ok_or_else(|| FetchError::Evaluation(format!("page snapshot returned {}", evaluated.result.object_type)))?;
	let page: RawPage = serde_json::from_value(value)?;
	debug!(url = %page.url, bytes = page.html.len(), "page snapshot");
	Ok(page)
}
