use serde::{Deserialize, Serialize};

use crate::{Result, ShelfService};
use shelf_domain::{catalog::Product, criteria::SearchCriteria, matcher};

#[derive(Clone, Debug, Deserialize)]
pub struct SearchRequest {
	pub query: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub criteria: SearchCriteria,
	pub items: Vec<Product>,
}

impl ShelfService {
	/// Keyword and category search over the current catalog.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let criteria = self.interpret(&req.query).await;

		if criteria.is_empty() {
			return Ok(SearchResponse { criteria, items: Vec::new() });
		}

		let products = self.catalog.list_products().await?;
		let items = matcher::find_products(&products, &criteria);

		tracing::debug!(
			terms = criteria.terms.len(),
			categories = criteria.categories.len(),
			catalog_size = products.len(),
			matched = items.len(),
			"Keyword search finished."
		);

		Ok(SearchResponse { criteria, items })
	}
}
