//! Wire types for the Chrome DevTools Protocol.
//!
//! This crate contains the serde-serializable types exchanged with a browser's
//! remote debugging endpoint: the HTTP discovery documents (`/json/version`,
//! `/json/list`) and the JSON-RPC frames sent over a page websocket.
//!
//! Types in this crate are pure data. They mirror the protocol shapes 1:1 and
//! carry no behaviour beyond serialization; the connection logic lives in
//! `webtotext-runtime`.

pub mod messages;
pub mod runtime;
pub mod target;

pub use messages::*;
pub use runtime::*;
pub use target::*;
