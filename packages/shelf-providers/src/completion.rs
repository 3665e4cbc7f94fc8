use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Result, invalid_response};

/// Sends one chat exchange and returns the assistant text untouched.
pub async fn complete(cfg: &shelf_config::LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_text(json)
}

fn parse_completion_text(json: Value) -> Result<String> {
	let choice = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.ok_or_else(|| invalid_response("Completion response is missing choices."))?;
	let content = choice
		.get("message")
		.and_then(|msg| msg.get("content"))
		.or_else(|| choice.get("text"))
		.ok_or_else(|| invalid_response("Completion choice is missing content."))?;

	match content {
		Value::String(text) => Ok(text.clone()),
		Value::Null => Ok(String::new()),
		_ => Err(invalid_response("Completion content must be a string.")),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn returns_raw_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "```json\n{\"searchTerms\": []}\n```" } }
			]
		});
		let text = parse_completion_text(json).expect("parse failed");

		assert_eq!(text, "```json\n{\"searchTerms\": []}\n```");
	}

	#[test]
	fn null_content_is_empty_text() {
		let json = serde_json::json!({ "choices": [{ "message": { "content": null } }] });

		assert_eq!(parse_completion_text(json).expect("parse failed"), "");
	}

	#[test]
	fn missing_choices_is_an_error() {
		assert!(parse_completion_text(serde_json::json!({ "error": "busy" })).is_err());
	}
}
