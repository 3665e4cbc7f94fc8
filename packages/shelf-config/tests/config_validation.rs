use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use shelf_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("shelf_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> shelf_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = shelf_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads_with_defaults() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config must be valid.");

	assert_eq!(cfg.search.interpreter, shelf_config::INTERPRETER_CRITERIA);
	assert_eq!(cfg.search.vector_top_k, 20);
	assert_eq!(cfg.search.max_image_bytes, 8 * 1_024 * 1_024);
	assert_eq!(cfg.providers.vision.features, vec!["caption", "objects", "tags"]);
	assert_eq!(cfg.storage.qdrant.vector_dim, 1_536);
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("shelf_config_test_does_not_exist.toml");

	let err = shelf_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = load_payload("[service\nhttp_bind = 1".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn interpreter_mode_is_normalized_before_validation() {
	let payload = sample_toml_with("search", "interpreter", Value::String(" Tokenize ".to_string()));
	let cfg = load_payload(payload).expect("Tokenize mode must be accepted.");

	assert_eq!(cfg.search.interpreter, shelf_config::INTERPRETER_TOKENIZE);
}

#[test]
fn interpreter_mode_must_be_known() {
	let payload = sample_toml_with("search", "interpreter", Value::String("magic".to_string()));
	let err = load_payload(payload).expect_err("Expected interpreter validation error.");

	assert!(
		err.to_string().contains("search.interpreter must be one of criteria or tokenize."),
		"Unexpected error: {err}"
	);
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let payload = sample_toml_with("providers.embedding", "dimensions", Value::Integer(768));
	let err = load_payload(payload).expect_err("Expected dimension validation error.");

	assert!(
		err.to_string()
			.contains("providers.embedding.dimensions must match storage.qdrant.vector_dim."),
		"Unexpected error: {err}"
	);
}

#[test]
fn vector_top_k_must_be_positive() {
	let mut cfg = base_config();

	cfg.search.vector_top_k = 0;

	let err = shelf_config::validate(&cfg).expect_err("Expected top_k validation error.");

	assert!(
		err.to_string().contains("search.vector_top_k must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn provider_api_keys_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.providers.vision.api_key = "  ".to_string();

	let err = shelf_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider vision api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn binds_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.service.admin_bind = String::new();

	let err = shelf_config::validate(&cfg).expect_err("Expected bind validation error.");

	assert!(
		err.to_string().contains("service.admin_bind must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn temperature_must_be_finite() {
	let mut cfg = base_config();

	cfg.providers.llm_interpreter.temperature = f32::NAN;

	let err = shelf_config::validate(&cfg).expect_err("Expected temperature validation error.");

	assert!(
		err.to_string().contains("providers.llm_interpreter.temperature must be a finite number."),
		"Unexpected error: {err}"
	);
}
