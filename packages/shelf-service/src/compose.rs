use serde::{Deserialize, Serialize};

use crate::{Result, SearchRequest, ShelfService, VectorSearchRequest};
use shelf_domain::{catalog::Product, criteria::SearchCriteria, merge};

/// The retrieval path whose results lead a combined search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPath {
	#[default]
	Keyword,
	Vector,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CombinedSearchRequest {
	pub query: String,
	#[serde(default)]
	pub primary: SearchPath,
	#[serde(default)]
	pub top_k: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CombinedSearchResponse {
	pub criteria: SearchCriteria,
	pub items: Vec<Product>,
}

impl ShelfService {
	/// Runs the keyword and vector paths and appends the secondary path's unseen products to the
	/// primary path's results.
	pub async fn search_combined(&self, req: CombinedSearchRequest) -> Result<CombinedSearchResponse> {
		let keyword = self.search(SearchRequest { query: req.query.clone() }).await?;
		let vector =
			self.search_vector(VectorSearchRequest { query: req.query, top_k: req.top_k }).await?;
		let items = match req.primary {
			SearchPath::Keyword => merge::merge_products(keyword.items, vector.items),
			SearchPath::Vector => merge::merge_products(vector.items, keyword.items),
		};

		Ok(CombinedSearchResponse { criteria: keyword.criteria, items })
	}
}
