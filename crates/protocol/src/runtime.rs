//! Parameter and result shapes for the `Page` and `Runtime` domains.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `Runtime.evaluate` parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
	pub expression: String,
	pub return_by_value: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub await_promise: Option<bool>,
}

impl EvaluateParams {
	pub fn by_value(expression: impl Into<String>) -> Self {
		Self {
			expression: expression.into(),
			return_by_value: true,
			await_promise: None,
		}
	}
}

/// Mirror object describing an evaluation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	#[serde(rename = "type")]
	pub object_type: String,
	#[serde(default)]
	pub subtype: Option<String>,
	#[serde(default)]
	pub value: Option<Value>,
	#[serde(default)]
	pub description: Option<String>,
}

/// Details of an exception thrown while evaluating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	#[serde(default)]
	pub text: String,
	#[serde(default)]
	pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
	/// Most specific human-readable description available.
	pub fn message(&self) -> String {
		self.exception
			.as_ref()
			.and_then(|e| e.description.clone())
			.unwrap_or_else(|| self.text.clone())
	}
}

/// `Runtime.evaluate` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
	pub result: RemoteObject,
	#[serde(default)]
	pub exception_details: Option<ExceptionDetails>,
}

/// `Page.navigate` parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateParams {
	pub url: String,
}

/// `Page.navigate` result. `error_text` is set for failures such as DNS errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
	pub frame_id: String,
	#[serde(default)]
	pub loader_id: Option<String>,
	#[serde(default)]
	pub error_text: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn evaluate_params_serialize_camel_case() {
		let params = EvaluateParams::by_value("document.title");
		assert_eq!(
			serde_json::to_value(params).unwrap(),
			json!({"expression": "document.title", "returnByValue": true})
		);
	}

	#[test]
	fn evaluate_result_with_exception() {
		let value = json!({
			"result": {"type": "object", "subtype": "error", "description": "ReferenceError: foo is not defined"},
			"exceptionDetails": {
				"text": "Uncaught",
				"exception": {"type": "object", "description": "ReferenceError: foo is not defined"}
			}
		});
		let result: EvaluateResult = serde_json::from_value(value).unwrap();
		let details = result.exception_details.unwrap();
		assert_eq!(details.message(), "ReferenceError: foo is not defined");
	}

	#[test]
	fn navigate_result_reports_error_text() {
		let result: NavigateResult =
			serde_json::from_value(json!({"frameId": "F", "loaderId": "L", "errorText": "net::ERR_NAME_NOT_RESOLVED"})).unwrap();
		assert_eq!(result.error_text.as_deref(), Some("net::ERR_NAME_NOT_RESOLVED"));
	}
}
