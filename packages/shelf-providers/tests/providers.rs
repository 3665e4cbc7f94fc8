use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

#[test]
fn builds_bearer_auth_header() {
	let headers =
		shelf_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn adds_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("Ocp-Apim-Subscription-Key".to_string(), Value::String("abc".to_string()));

	let headers =
		shelf_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get("ocp-apim-subscription-key").expect("Missing default header."), "abc");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	let err = shelf_providers::auth_headers("secret", &defaults)
		.expect_err("Expected invalid header config.");

	assert!(matches!(err, shelf_providers::Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn unreachable_embedding_endpoint_is_an_error() {
	let cfg = shelf_config::EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/".to_string(),
		model: "test".to_string(),
		dimensions: 3,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	};
	let result = shelf_providers::embedding::embed(&cfg, &["laptop".to_string()]).await;

	assert!(matches!(result, Err(shelf_providers::Error::Reqwest(_))));
}
