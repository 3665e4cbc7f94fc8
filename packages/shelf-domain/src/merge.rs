use std::{collections::HashSet, hash::Hash};

use crate::catalog::Product;

/// Concatenates `primary` and `secondary`, keeping the first occurrence of every key.
///
/// Relative order inside each input is preserved and every primary item precedes every
/// secondary-only item.
pub fn merge_unique<T, K, F, P, S>(primary: P, secondary: S, key: F) -> Vec<T>
where
	P: IntoIterator<Item = T>,
	S: IntoIterator<Item = T>,
	K: Eq + Hash,
	F: Fn(&T) -> K,
{
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for item in primary.into_iter().chain(secondary) {
		if seen.insert(key(&item)) {
			out.push(item);
		}
	}

	out
}

pub fn merge_products(primary: Vec<Product>, secondary: Vec<Product>) -> Vec<Product> {
	merge_unique(primary, secondary, |product| product.product_id)
}
