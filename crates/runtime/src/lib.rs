//! Browser side of webtotext.
//!
//! Talks to a Chromium-family browser over its remote debugging endpoint:
//! [`discovery`] speaks the HTTP half (`/json/version`, `/json/list`,
//! `/json/new`), [`connection`] the websocket half, and [`CdpFetcher`] puts
//! them together behind the [`PageSource`] trait. [`launcher`] starts a
//! browser when none is running.

pub mod connection;
pub mod discovery;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod launcher;

pub use connection::CdpConnection;
pub use discovery::{Discovered, launch_hint};
pub use endpoint::DebugEndpoint;
pub use error::{FetchError, Result};
pub use fetch::{CdpFetcher, FetchOptions, PageSource, RawPage, TabInfo, TabSelector, Target};
pub use launcher::{LaunchOptions, LaunchedBrowser, launch_browser};
