use serde::{Deserialize, Serialize};

/// Hits at or below this similarity never reach the caller.
pub const VECTOR_SCORE_THRESHOLD: f32 = 0.5;

/// One entry of the vector index: the stringified product id, the indexed description and its
/// embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
	pub key: String,
	pub description: String,
	pub embedding: Vec<f32>,
}
impl VectorRecord {
	pub fn for_product(product_id: i32, description: &str, embedding: Vec<f32>) -> Self {
		Self { key: product_id.to_string(), description: description.to_string(), embedding }
	}
}

/// A nearest-neighbour result as returned by the index, in index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
	pub key: String,
	pub description: Option<String>,
	pub score: Option<f32>,
}
impl VectorHit {
	/// The product id this hit may resolve to, provided it carries a score above
	/// [`VECTOR_SCORE_THRESHOLD`] and an integer key.
	pub fn candidate_product_id(&self) -> Option<i32> {
		let score = self.score?;

		if score.is_nan() || score <= VECTOR_SCORE_THRESHOLD {
			return None;
		}

		self.key.trim().parse().ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hit(key: &str, score: Option<f32>) -> VectorHit {
		VectorHit { key: key.to_string(), description: None, score }
	}

	#[test]
	fn threshold_is_exclusive() {
		assert_eq!(hit("1", Some(0.5)).candidate_product_id(), None);
		assert_eq!(hit("1", Some(0.500_1)).candidate_product_id(), Some(1));
	}

	#[test]
	fn unscored_and_non_integer_hits_are_dropped() {
		assert_eq!(hit("1", None).candidate_product_id(), None);
		assert_eq!(hit("sku-1", Some(0.9)).candidate_product_id(), None);
		assert_eq!(hit("1", Some(f32::NAN)).candidate_product_id(), None);
	}
}
