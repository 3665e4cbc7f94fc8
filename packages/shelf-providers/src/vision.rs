use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;

use crate::{Result, invalid_response};

#[derive(Debug, Clone, PartialEq)]
pub struct VisionLabel {
	pub name: String,
	pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisionObject {
	pub labels: Vec<VisionLabel>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisionResponse {
	pub caption: Option<String>,
	pub objects: Vec<VisionObject>,
	pub tags: Vec<VisionLabel>,
}

pub async fn analyze(cfg: &shelf_config::VisionProviderConfig, image: &[u8]) -> Result<VisionResponse> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let features = cfg.features.join(",");
	let res = client
		.post(url)
		.query(&[("features", features.as_str())])
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.header(CONTENT_TYPE, "application/octet-stream")
		.body(image.to_vec())
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_vision_response(&json)
}

/// Accepts both the sectioned layout (`captionResult`, `objectsResult`, `tagsResult`) and the flat
/// layout (`description.captions`, `objects` with `parent` chains, `tags`).
fn parse_vision_response(json: &Value) -> Result<VisionResponse> {
	if !json.is_object() {
		return Err(invalid_response("Vision response must be a JSON object."));
	}

	let caption = json
		.pointer("/captionResult/text")
		.or_else(|| json.pointer("/description/captions/0/text"))
		.and_then(|v| v.as_str())
		.map(str::to_string);
	let objects = match json.pointer("/objectsResult/values").or_else(|| json.get("objects")) {
		Some(Value::Array(items)) => items.iter().map(parse_object).collect::<Result<Vec<_>>>()?,
		Some(Value::Null) | None => Vec::new(),
		Some(_) => return Err(invalid_response("Vision objects must be an array.")),
	};
	let tags = match json.pointer("/tagsResult/values").or_else(|| json.get("tags")) {
		Some(Value::Array(items)) => items.iter().map(parse_label).collect::<Result<Vec<_>>>()?,
		Some(Value::Null) | None => Vec::new(),
		Some(_) => return Err(invalid_response("Vision tags must be an array.")),
	};

	Ok(VisionResponse { caption, objects, tags })
}

fn parse_object(item: &Value) -> Result<VisionObject> {
	if let Some(tags) = item.get("tags").and_then(|v| v.as_array()) {
		let labels = tags.iter().map(parse_label).collect::<Result<Vec<_>>>()?;

		return Ok(VisionObject { labels });
	}

	let mut labels = Vec::new();
	let mut current = Some(item);

	while let Some(node) = current {
		let Some(name) = node.get("object").and_then(|v| v.as_str()) else {
			break;
		};

		labels.push(VisionLabel { name: name.to_string(), confidence: confidence(node)? });

		current = node.get("parent");
	}

	Ok(VisionObject { labels })
}

fn parse_label(item: &Value) -> Result<VisionLabel> {
	let name = item
		.get("name")
		.and_then(|v| v.as_str())
		.ok_or_else(|| invalid_response("Vision label is missing name."))?;

	Ok(VisionLabel { name: name.to_string(), confidence: confidence(item)? })
}

fn confidence(item: &Value) -> Result<f32> {
	let value = item
		.get("confidence")
		.and_then(|v| v.as_f64())
		.ok_or_else(|| invalid_response("Vision label is missing confidence."))?;

	Ok(value.clamp(0.0, 1.0) as f32)
}
