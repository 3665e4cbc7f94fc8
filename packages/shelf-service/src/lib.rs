pub mod admin;
pub mod catalog;
pub mod compose;
pub mod image;
pub mod interpret;
pub mod memory;
pub mod search;
pub mod vector;

mod error;

pub use admin::RebuildReport;
pub use catalog::ProductDraft;
pub use compose::{CombinedSearchRequest, CombinedSearchResponse, SearchPath};
pub use error::{Error, Result};
pub use image::ImageSearchResponse;
pub use memory::MemoryCatalog;
pub use search::{SearchRequest, SearchResponse};
pub use vector::{VectorSearchRequest, VectorSearchResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use shelf_config::{Config, EmbeddingProviderConfig, LlmProviderConfig, VisionProviderConfig};
use shelf_domain::{
	catalog::{Product, Tag},
	vector::{VectorHit, VectorRecord},
};
use shelf_providers::{completion, embedding, vision, vision::VisionResponse};
use shelf_storage::{db::Db, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read and write access to products, tags and their associations.
///
/// Listings are ordered by id and every product carries its tags ordered by tag id.
pub trait CatalogStore
where
	Self: Send + Sync,
{
	fn list_products(&self) -> BoxFuture<'_, Result<Vec<Product>>>;

	fn get_product(&self, product_id: i32) -> BoxFuture<'_, Result<Option<Product>>>;

	fn list_products_by_tag(&self, tag_id: i32) -> BoxFuture<'_, Result<Vec<Product>>>;

	fn list_tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>>;

	/// Unknown tag ids fail with [`Error::InvalidRequest`] and nothing is written.
	fn insert_product<'a>(&'a self, draft: &'a ProductDraft) -> BoxFuture<'a, Result<Product>>;

	/// Replaces the fields and the tag set. `None` when the product does not exist.
	fn update_product<'a>(
		&'a self,
		product_id: i32,
		draft: &'a ProductDraft,
	) -> BoxFuture<'a, Result<Option<Product>>>;

	fn delete_product(&self, product_id: i32) -> BoxFuture<'_, Result<bool>>;

	fn insert_tag<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Tag>>;
}

pub trait VectorIndex
where
	Self: Send + Sync,
{
	/// Up to `limit` records closest to `vector`, most similar first.
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<VectorHit>>>;

	fn upsert<'a>(&'a self, records: &'a [VectorRecord]) -> BoxFuture<'a, Result<()>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>>;
}

pub trait VisionProvider
where
	Self: Send + Sync,
{
	fn analyze<'a>(
		&'a self,
		cfg: &'a VisionProviderConfig,
		image: &'a [u8],
	) -> BoxFuture<'a, Result<VisionResponse>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
	pub vision: Arc<dyn VisionProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		completion: Arc<dyn CompletionProvider>,
		vision: Arc<dyn VisionProvider>,
	) -> Self {
		Self { embedding, completion, vision }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), completion: provider.clone(), vision: provider }
	}
}

pub struct ShelfService {
	pub cfg: Config,
	pub catalog: Arc<dyn CatalogStore>,
	pub index: Arc<dyn VectorIndex>,
	pub providers: Providers,
}
impl ShelfService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self::with_parts(cfg, Arc::new(db), Arc::new(qdrant), Providers::default())
	}

	pub fn with_parts(
		cfg: Config,
		catalog: Arc<dyn CatalogStore>,
		index: Arc<dyn VectorIndex>,
		providers: Providers,
	) -> Self {
		Self { cfg, catalog, index, providers }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}
impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(completion::complete(cfg, messages).await?) })
	}
}
impl VisionProvider for DefaultProviders {
	fn analyze<'a>(
		&'a self,
		cfg: &'a VisionProviderConfig,
		image: &'a [u8],
	) -> BoxFuture<'a, Result<VisionResponse>> {
		Box::pin(async move { Ok(vision::analyze(cfg, image).await?) })
	}
}
