use serde::{Deserialize, Serialize};

use crate::{Error, Result, ShelfService};
use shelf_domain::vector::VectorRecord;

const EMBED_BATCH_SIZE: usize = 64;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RebuildReport {
	pub indexed_count: u64,
	/// Products whose embedding had the wrong dimension.
	pub skipped_count: u64,
	/// Products whose batch the index refused.
	pub error_count: u64,
}

impl ShelfService {
	/// Re-embeds every product description and upserts it into the vector index.
	pub async fn rebuild_index(&self) -> Result<RebuildReport> {
		let products = self.catalog.list_products().await?;
		let vector_dim = self.cfg.storage.qdrant.vector_dim as usize;
		let mut indexed_count = 0_u64;
		let mut skipped_count = 0_u64;
		let mut error_count = 0_u64;

		for batch in products.chunks(EMBED_BATCH_SIZE) {
			let texts: Vec<String> =
				batch.iter().map(|product| product.description.clone()).collect();
			let embeddings = self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

			if embeddings.len() != batch.len() {
				return Err(Error::Provider {
					message: format!(
						"Embedding provider returned {} vectors for {} texts.",
						embeddings.len(),
						batch.len()
					),
				});
			}

			let mut records = Vec::with_capacity(batch.len());

			for (product, embedding) in batch.iter().zip(embeddings) {
				if embedding.len() != vector_dim {
					tracing::warn!(
						product_id = product.product_id,
						dim = embedding.len(),
						expected = vector_dim,
						"Skipping product with mismatched embedding dimension."
					);

					skipped_count += 1;

					continue;
				}

				records.push(VectorRecord::for_product(
					product.product_id,
					&product.description,
					embedding,
				));
			}

			match self.index.upsert(&records).await {
				Ok(()) => indexed_count += records.len() as u64,
				Err(err) => {
					tracing::error!(error = %err, batch_len = records.len(), "Vector upsert failed.");

					error_count += records.len() as u64;
				},
			}
		}

		tracing::info!(indexed_count, skipped_count, error_count, "Vector index rebuilt.");

		Ok(RebuildReport { indexed_count, skipped_count, error_count })
	}
}
