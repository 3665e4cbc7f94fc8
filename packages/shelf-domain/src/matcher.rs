//! Keyword and category matching over an in-memory catalog snapshot.

use crate::{
	catalog::Product,
	criteria::{Priority, SearchCriteria},
	merge,
};

/// Ranks `products` against `criteria`.
///
/// Term matches hit the name or the description, category matches hit a tag name; both are
/// case-insensitive substring tests. The set named by the priority leads and the other set only
/// contributes products not already present.
pub fn find_products(products: &[Product], criteria: &SearchCriteria) -> Vec<Product> {
	if criteria.is_empty() {
		return Vec::new();
	}

	let terms = lowercase_all(&criteria.terms);
	let categories = lowercase_all(&criteria.categories);
	let term_matches = products.iter().filter(|product| matches_terms(product, &terms));
	let category_matches =
		products.iter().filter(|product| matches_categories(product, &categories));
	let merged = match criteria.priority {
		Priority::KeywordsFirst =>
			merge::merge_unique(term_matches, category_matches, |product| product.product_id),
		Priority::CategoriesFirst =>
			merge::merge_unique(category_matches, term_matches, |product| product.product_id),
	};

	merged.into_iter().cloned().collect()
}

/// Single-pass variant: any whitespace-separated word of `query` found in the name or the
/// description. Tags are not consulted.
pub fn find_products_by_query(products: &[Product], query: &str) -> Vec<Product> {
	find_products(products, &SearchCriteria::from_query(query))
}

pub fn matches_terms(product: &Product, lowercase_terms: &[String]) -> bool {
	if lowercase_terms.is_empty() {
		return false;
	}

	let name = product.name.to_lowercase();
	let description = product.description.to_lowercase();

	lowercase_terms.iter().any(|term| name.contains(term) || description.contains(term))
}

pub fn matches_categories(product: &Product, lowercase_categories: &[String]) -> bool {
	if lowercase_categories.is_empty() {
		return false;
	}

	product.tags.iter().any(|tag| {
		let tag_name = tag.name.to_lowercase();

		lowercase_categories.iter().any(|category| tag_name.contains(category))
	})
}

fn lowercase_all(values: &[String]) -> Vec<String> {
	values.iter().map(|value| value.to_lowercase()).collect()
}
