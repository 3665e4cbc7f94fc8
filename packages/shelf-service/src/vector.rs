use std::collections::HashMap;

use qdrant_client::{
	client::Payload,
	qdrant::{
		PointId, PointStruct, Query, QueryPointsBuilder, ScoredPoint, UpsertPointsBuilder, Vector,
		point_id::PointIdOptions, value::Kind,
	},
};
use serde::{Deserialize, Serialize};

use crate::{BoxFuture, Error, Result, ShelfService, VectorIndex};
use shelf_domain::{
	catalog::Product,
	vector::{VectorHit, VectorRecord},
};
use shelf_storage::qdrant::{DENSE_VECTOR_NAME, DESCRIPTION_PAYLOAD_KEY, QdrantStore};

#[derive(Clone, Debug, Deserialize)]
pub struct VectorSearchRequest {
	pub query: String,
	/// Neighbours requested from the index. Defaults to `search.vector_top_k`.
	#[serde(default)]
	pub top_k: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VectorSearchResponse {
	pub items: Vec<Product>,
}

impl ShelfService {
	/// Semantic search over product descriptions.
	///
	/// Hits without a score above the similarity threshold, with a non-integer key, or whose product
	/// no longer exists are dropped. The index order of the remaining hits is kept.
	pub async fn search_vector(&self, req: VectorSearchRequest) -> Result<VectorSearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Ok(VectorSearchResponse { items: Vec::new() });
		}

		let top_k = req.top_k.unwrap_or(self.cfg.search.vector_top_k);

		if top_k == 0 {
			return Err(Error::InvalidRequest {
				message: "top_k must be greater than zero.".to_string(),
			});
		}

		let vector = self.embed_query(query).await?;
		let hits = self.index.nearest(&vector, top_k).await?;
		let mut items = Vec::new();

		for hit in hits {
			let Some(product_id) = hit.candidate_product_id() else {
				tracing::debug!(key = %hit.key, score = ?hit.score, "Skipping vector hit.");

				continue;
			};

			match self.catalog.get_product(product_id).await? {
				Some(product) => items.push(product),
				None => tracing::debug!(product_id, "Vector hit has no catalog product."),
			}
		}

		Ok(VectorSearchResponse { items })
	}

	async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
		let embeddings =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &[query.to_string()]).await?;
		let Some(vector) = embeddings.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vector)
	}
}

impl VectorIndex for QdrantStore {
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<VectorHit>>> {
		Box::pin(async move {
			let search = QueryPointsBuilder::new(self.collection.clone())
				.query(Query::new_nearest(vector.to_vec()))
				.using(DENSE_VECTOR_NAME)
				.limit(u64::from(limit))
				.with_payload(true);
			let response = self
				.client
				.query(search)
				.await
				.map_err(|err| Error::VectorIndex { message: err.to_string() })?;

			Ok(response.result.iter().filter_map(scored_point_to_hit).collect())
		})
	}

	fn upsert<'a>(&'a self, records: &'a [VectorRecord]) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if records.is_empty() {
				return Ok(());
			}

			let mut points = Vec::with_capacity(records.len());

			for record in records {
				let point_id: u64 = record.key.parse().map_err(|_| Error::VectorIndex {
					message: format!("Vector record key {:?} is not a point id.", record.key),
				})?;
				let mut vectors = HashMap::new();
				let mut payload = Payload::new();

				vectors.insert(DENSE_VECTOR_NAME.to_string(), Vector::from(record.embedding.clone()));
				payload.insert(DESCRIPTION_PAYLOAD_KEY, record.description.clone());
				points.push(PointStruct::new(point_id, vectors, payload));
			}

			self.client
				.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
				.await
				.map_err(|err| Error::VectorIndex { message: err.to_string() })?;

			Ok(())
		})
	}
}

fn scored_point_to_hit(point: &ScoredPoint) -> Option<VectorHit> {
	let key = point.id.as_ref().and_then(point_id_to_key)?;
	let description = point.payload.get(DESCRIPTION_PAYLOAD_KEY).and_then(|value| {
		match &value.kind {
			Some(Kind::StringValue(text)) => Some(text.clone()),
			_ => None,
		}
	});

	Some(VectorHit { key, description, score: Some(point.score) })
}

fn point_id_to_key(point_id: &PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Num(id)) => Some(id.to_string()),
		Some(PointIdOptions::Uuid(id)) => Some(id.clone()),
		None => None,
	}
}
