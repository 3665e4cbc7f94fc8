use std::sync::Arc;

use serde_json::Value;

use shelf_config::{EmbeddingProviderConfig, LlmProviderConfig, VisionProviderConfig};
use shelf_providers::vision::VisionResponse;
use shelf_service::{
	BoxFuture, CompletionProvider, EmbeddingProvider, Error, ProductDraft, Providers, Result,
	ShelfService, VectorSearchRequest, VisionProvider,
};
use shelf_storage::{db::Db, qdrant::QdrantStore};
use shelf_testkit::TestDatabase;

const DIM: u32 = 3;

/// Maps texts onto fixed axes so similarity is predictable.
struct AxisEmbedding;
impl EmbeddingProvider for AxisEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		let vectors = texts
			.iter()
			.map(|text| {
				let text = text.to_lowercase();

				if text.contains("laptop") {
					vec![1.0, 0.0, 0.0]
				} else if text.contains("cotton") {
					vec![0.0, 1.0, 0.0]
				} else {
					vec![0.0, 0.0, 1.0]
				}
			})
			.collect();

		Box::pin(async move { Ok(vectors) })
	}
}

struct Offline;
impl CompletionProvider for Offline {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async { Err(Error::Provider { message: "offline".to_string() }) })
	}
}
impl VisionProvider for Offline {
	fn analyze<'a>(
		&'a self,
		_cfg: &'a VisionProviderConfig,
		_image: &'a [u8],
	) -> BoxFuture<'a, Result<VisionResponse>> {
		Box::pin(async { Err(Error::Provider { message: "offline".to_string() }) })
	}
}

fn test_config(dsn: &str, qdrant_url: &str, collection: &str) -> shelf_config::Config {
	let template = include_str!("../../shelf-config/tests/fixtures/sample_config.template.toml");
	let mut cfg: shelf_config::Config =
		toml::from_str(template).expect("Sample config must parse.");

	cfg.storage.postgres.dsn = dsn.to_string();
	cfg.storage.qdrant.url = qdrant_url.to_string();
	cfg.storage.qdrant.collection = collection.to_string();
	cfg.storage.qdrant.vector_dim = DIM;
	cfg.providers.embedding.dimensions = DIM;

	cfg
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set SHELF_PG_DSN and SHELF_QDRANT_URL to run."]
async fn rebuilt_index_serves_vector_search() {
	let (Some(base_dsn), Some(qdrant_url)) = (shelf_testkit::env_dsn(), shelf_testkit::env_qdrant_url())
	else {
		eprintln!(
			"Skipping rebuilt_index_serves_vector_search; set SHELF_PG_DSN and SHELF_QDRANT_URL to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let collection = test_db.collection_name("shelf_products");
	let cfg = test_config(test_db.dsn(), &qdrant_url, &collection);
	let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let qdrant = QdrantStore::new(&cfg.storage.qdrant).expect("Failed to build Qdrant client.");

	qdrant.ensure_collection().await.expect("Failed to create collection.");
	qdrant.ensure_collection().await.expect("Collection setup must be repeatable.");

	let offline = Arc::new(Offline);
	let providers = Providers::new(Arc::new(AxisEmbedding), offline.clone(), offline);
	let service = ShelfService::with_parts(cfg, Arc::new(db), Arc::new(qdrant), providers);
	let electronics = service.add_tag("Electronics").await.expect("Tag insert failed.");
	let laptop = service
		.add_product(ProductDraft {
			name: "Laptop".to_string(),
			description: "High-performance laptop.".to_string(),
			tag_ids: vec![electronics.tag_id],
		})
		.await
		.expect("Insert failed.");

	service
		.add_product(ProductDraft {
			name: "T-Shirt".to_string(),
			description: "Cotton t-shirt.".to_string(),
			tag_ids: Vec::new(),
		})
		.await
		.expect("Insert failed.");

	let report = service.rebuild_index().await.expect("Rebuild failed.");

	assert_eq!(report.indexed_count, 2);

	let response = service
		.search_vector(VectorSearchRequest { query: "laptop please".to_string(), top_k: None })
		.await
		.expect("Vector search failed.");

	assert_eq!(response.items.len(), 1);
	assert_eq!(response.items[0].product_id, laptop.product_id);
	assert_eq!(response.items[0].tags, vec![electronics]);

	drop(service);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
