//! JSON-RPC over a page websocket.
//!
//! # Message flow
//!
//! 1. [`CdpConnection::call`] takes the next id and parks a oneshot sender
//!    under it
//! 2. The request frame is written through the shared sink
//! 3. The reader task parses every inbound frame: responses complete the
//!    parked sender with the same id, events go to the broadcast channel
//! 4. The caller awaits its receiver, bounded by the call timeout
//!
//! A connection serves one page. When the peer goes away every call still in
//! flight fails with [`FetchError::ConnectionClosed`]; dropping the connection
//! aborts the reader task.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};
use webtotext_protocol::{Event, Message, Request};

use crate::error::{FetchError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type Callbacks = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

const EVENT_CAPACITY: usize = 64;

pub struct CdpConnection {
	last_id: AtomicU64,
	callbacks: Callbacks,
	sink: Mutex<WsSink>,
	events: broadcast::Receiver<Event>,
	call_timeout: Duration,
	reader: JoinHandle<()>,
}

impl CdpConnection {
	/// Opens the websocket at `ws_url` and starts the reader task.
	pub async fn connect(ws_url: &str, call_timeout: Duration) -> Result<Self> {
		let (stream, _) = tokio_tungstenite::connect_async(ws_url)
			.await
			.map_err(|e| FetchError::WebSocket(format!("failed to connect to {ws_url}: {e}")))?;
		debug!(%ws_url, "page websocket connected");

		let (sink, source) = stream.split();
		let callbacks: Callbacks = Arc::new(Mutex::new(HashMap::new()));
		let (event_tx, events) = broadcast::channel(EVENT_CAPACITY);

		let reader = tokio::spawn(read_loop(source, Arc::clone(&callbacks), event_tx));

		Ok(Self {
			last_id: AtomicU64::new(0),
			callbacks,
			sink: Mutex::new(sink),
			events,
			call_timeout,
			reader,
		})
	}

	/// Receives every event that arrives after this call. The receiver
	/// reports `Closed` once the reader task stops.
	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.events.resubscribe()
	}

	pub fn call_timeout(&self) -> Duration {
		self.call_timeout
	}

	/// Sends `method` and waits for the matching response.
	pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
		let request = Request {
			id,
			method: method.to_string(),
			params,
		};
		let frame = serde_json::to_string(&request)?;
		trace!(%frame, "cdp send");

		let (tx, rx) = oneshot::channel();
		self.callbacks.lock().await.insert(id, tx);

		let sent = self.sink.lock().await.send(WsMessage::Text(frame.into())).await;
		if let Err(e) = sent {
			self.callbacks.lock().await.remove(&id);
			return Err(e.into());
		}

		match tokio::time::timeout(self.call_timeout, rx).await {
			Ok(Ok(result)) => result,
			Ok(Err(_)) => Err(FetchError::ConnectionClosed),
			Err(_) => {
				self.callbacks.lock().await.remove(&id);
				Err(FetchError::Timeout {
					method: method.to_string(),
					ms: self.call_timeout.as_millis() as u64,
				})
			}
		}
	}

	/// [`call`](Self::call) with typed parameters and result.
	pub async fn call_as<P: Serialize, R: DeserializeOwned>(&self, method: &str, params: &P) -> Result<R> {
		let value = self.call(method, serde_json::to_value(params)?).await?;
		Ok(serde_json::from_value(value)?)
	}
}

impl Drop for CdpConnection {
	fn drop(&mut self) {
		self.reader.abort();
	}
}

/// Waits on `events` for the first event named `method`.
pub async fn wait_for_event(events: &mut broadcast::Receiver<Event>, method: &str, timeout: Duration) -> Result<Event> {
	let wait = async {
		loop {
			match events.recv().await {
				Ok(event) if event.method == method => return Ok(event),
				Ok(_) => continue,
				Err(broadcast::error::RecvError::Lagged(skipped)) => {
					warn!(skipped, "event receiver lagged");
					continue;
				}
				Err(broadcast::error::RecvError::Closed) => return Err(FetchError::ConnectionClosed),
			}
		}
	};

	tokio::time::timeout(timeout, wait).await.unwrap_or_else(|_| {
		Err(FetchError::Timeout {
			method: method.to_string(),
			ms: timeout.as_millis() as u64,
		})
	})
}

async fn read_loop(mut source: SplitStream<WsStream>, callbacks: Callbacks, events: broadcast::Sender<Event>) {
	while let Some(frame) = source.next().await {
		let text = match frame {
			Ok(WsMessage::Text(text)) => text,
			Ok(WsMessage::Close(_)) => {
				debug!("page websocket closed by peer");
				break;
			}
			Ok(_) => continue,
			Err(e) => {
				warn!(error = %e, "page websocket read failed");
				break;
			}
		};
		trace!(frame = %text, "cdp recv");

		match serde_json::from_str::<Message>(&text) {
			Ok(Message::Response(response)) => {
				let Some(tx) = callbacks.lock().await.remove(&response.id) else {
					debug!(id = response.id, "response without a pending call");
					continue;
				};
				let result = match response.error {
					Some(error) => Err(FetchError::Protocol {
						code: error.code,
						message: error.message,
					}),
					None => Ok(response.result.unwrap_or(Value::Null)),
				};
				let _ = tx.send(result);
			}
			Ok(Message::Event(event)) => {
				let _ = events.send(event);
			}
			Err(e) => warn!(error = %e, "unparseable CDP frame"),
		}
	}

	// Dropping the senders wakes every waiting caller.
	callbacks.lock().await.clear();
}
