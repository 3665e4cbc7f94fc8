mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers, Qdrant, Search,
	Security, Service, Storage, VisionProviderConfig,
};

use std::{fs, path::Path};

pub const INTERPRETER_CRITERIA: &str = "criteria";
pub const INTERPRETER_TOKENIZE: &str = "tokenize";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("storage.qdrant.url", &cfg.storage.qdrant.url),
		("storage.qdrant.collection", &cfg.storage.qdrant.collection),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if !cfg.providers.llm_interpreter.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm_interpreter.temperature must be a finite number.".to_string(),
		});
	}
	if cfg.providers.vision.features.is_empty() {
		return Err(Error::Validation {
			message: "providers.vision.features must be non-empty.".to_string(),
		});
	}

	let interpreter = cfg.search.interpreter.as_str();

	if !matches!(interpreter, INTERPRETER_CRITERIA | INTERPRETER_TOKENIZE) {
		return Err(Error::Validation {
			message: "search.interpreter must be one of criteria or tokenize.".to_string(),
		});
	}
	if cfg.search.vector_top_k == 0 {
		return Err(Error::Validation {
			message: "search.vector_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_image_bytes == 0 {
		return Err(Error::Validation {
			message: "search.max_image_bytes must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("llm_interpreter", &cfg.providers.llm_interpreter.api_key),
		("vision", &cfg.providers.vision.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.interpreter = cfg.search.interpreter.trim().to_ascii_lowercase();

	cfg.providers.vision.features.retain(|feature| !feature.trim().is_empty());
}
