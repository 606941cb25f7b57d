//! JSON-RPC frames exchanged over a page websocket.
//!
//! ```json
//! {"id": 3, "method": "Runtime.evaluate", "params": {"expression": "1 + 1"}}
//! {"id": 3, "result": {"result": {"type": "number", "value": 2}}}
//! {"method": "Page.loadEventFired", "params": {"timestamp": 1234.5}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command sent to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
	/// Correlation id, echoed back in the matching [`Response`].
	pub id: u64,
	pub method: String,
	#[serde(default, skip_serializing_if = "Value::is_null")]
	pub params: Value,
}

/// Reply to a [`Request`]. Exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
	pub id: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<ProtocolError>,
}

/// Error object of a failed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolError {
	pub code: i64,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<String>,
}

/// Unsolicited notification, e.g. `Page.loadEventFired`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
	pub method: String,
	#[serde(default)]
	pub params: Value,
}

/// Any inbound frame. Frames with an `id` are responses, the rest are events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
	Response(Response),
	Event(Event),
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn request_omits_null_params() {
		let request = Request {
			id: 1,
			method: "Page.enable".to_string(),
			params: Value::Null,
		};
		assert_eq!(serde_json::to_value(&request).unwrap(), json!({"id": 1, "method": "Page.enable"}));
	}

	#[test]
	fn response_frames_parse_as_responses() {
		let message: Message = serde_json::from_str(r#"{"id": 7, "result": {"frameId": "F1"}}"#).unwrap();
		match message {
			Message::Response(response) => {
				assert_eq!(response.id, 7);
				assert_eq!(response.result.unwrap()["frameId"], "F1");
				assert!(response.error.is_none());
			}
			Message::Event(_) => panic!("expected response"),
		}
	}

	#[test]
	fn error_frames_carry_code_and_message() {
		let message: Message = serde_json::from_str(r#"{"id": 2, "error": {"code": -32601, "message": "'Foo.bar' wasn't found"}}"#).unwrap();
		let Message::Response(response) = message else {
			panic!("expected response");
		};
		let error = response.error.unwrap();
		assert_eq!(error.code, -32601);
		assert!(error.message.contains("Foo.bar"));
	}

	#[test]
	fn frames_without_id_parse_as_events() {
		let message: Message = serde_json::from_str(r#"{"method": "Page.loadEventFired", "params": {"timestamp": 12.5}}"#).unwrap();
		match message {
			Message::Event(event) => {
				assert_eq!(event.method, "Page.loadEventFired");
				assert_eq!(event.params["timestamp"], 12.5);
			}
			Message::Response(_) => panic!("expected event"),
		}
	}
}
