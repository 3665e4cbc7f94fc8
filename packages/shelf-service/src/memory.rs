//! An in-process catalog for embedding the service without Postgres.

use std::{collections::BTreeMap, sync::RwLock};

use crate::{
	BoxFuture, CatalogStore, Result,
	catalog::{self, ProductDraft},
};
use shelf_domain::catalog::{Product, Tag};

#[derive(Default)]
pub struct MemoryCatalog {
	state: RwLock<State>,
}
impl MemoryCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds the catalog with products and every tag they carry, keeping their ids.
	pub fn with_products(products: Vec<Product>) -> Self {
		let mut state = State::default();

		for product in products {
			let mut tag_ids = Vec::with_capacity(product.tags.len());

			for tag in product.tags {
				tag_ids.push(tag.tag_id);
				state.tags.insert(tag.tag_id, tag.name);
			}

			tag_ids.sort_unstable();
			tag_ids.dedup();
			state.products.insert(
				product.product_id,
				StoredProduct { name: product.name, description: product.description, tag_ids },
			);
		}

		Self { state: RwLock::new(state) }
	}

	fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
		f(&self.state.read().unwrap_or_else(|err| err.into_inner()))
	}

	fn write<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
		f(&mut self.state.write().unwrap_or_else(|err| err.into_inner()))
	}
}

impl CatalogStore for MemoryCatalog {
	fn list_products(&self) -> BoxFuture<'_, Result<Vec<Product>>> {
		let products: Vec<Product> = self.read(|state| {
			state.products.keys().filter_map(|product_id| state.product(*product_id)).collect()
		});

		Box::pin(async move { Ok(products) })
	}

	fn get_product(&self, product_id: i32) -> BoxFuture<'_, Result<Option<Product>>> {
		let product = self.read(|state| state.product(product_id));

		Box::pin(async move { Ok(product) })
	}

	fn list_products_by_tag(&self, tag_id: i32) -> BoxFuture<'_, Result<Vec<Product>>> {
		let products: Vec<Product> = self.read(|state| {
			state
				.products
				.iter()
				.filter(|(_, stored)| stored.tag_ids.contains(&tag_id))
				.filter_map(|(product_id, _)| state.product(*product_id))
				.collect()
		});

		Box::pin(async move { Ok(products) })
	}

	fn list_tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>> {
		let tags: Vec<Tag> = self.read(|state| {
			state.tags.iter().map(|(tag_id, name)| Tag { tag_id: *tag_id, name: name.clone() }).collect()
		});

		Box::pin(async move { Ok(tags) })
	}

	fn insert_product<'a>(&'a self, draft: &'a ProductDraft) -> BoxFuture<'a, Result<Product>> {
		let result: Result<Product> = self.write(|state| {
			let tag_ids = state.checked_tag_ids(&draft.tag_ids)?;
			let product_id = state.products.keys().next_back().map_or(1, |last| last + 1);

			state.products.insert(
				product_id,
				StoredProduct {
					name: draft.name.clone(),
					description: draft.description.clone(),
					tag_ids,
				},
			);

			state.product(product_id).ok_or_else(|| catalog::product_not_found(product_id))
		});

		Box::pin(async move { result })
	}

	fn update_product<'a>(
		&'a self,
		product_id: i32,
		draft: &'a ProductDraft,
	) -> BoxFuture<'a, Result<Option<Product>>> {
		let result: Result<Option<Product>> = self.write(|state| {
			if !state.products.contains_key(&product_id) {
				return Ok(None);
			}

			let tag_ids = state.checked_tag_ids(&draft.tag_ids)?;

			state.products.insert(
				product_id,
				StoredProduct {
					name: draft.name.clone(),
					description: draft.description.clone(),
					tag_ids,
				},
			);

			Ok(state.product(product_id))
		});

		Box::pin(async move { result })
	}

	fn delete_product(&self, product_id: i32) -> BoxFuture<'_, Result<bool>> {
		let deleted = self.write(|state| state.products.remove(&product_id).is_some());

		Box::pin(async move { Ok(deleted) })
	}

	fn insert_tag<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Tag>> {
		let tag = self.write(|state| {
			let tag_id = state.tags.keys().next_back().map_or(1, |last| last + 1);

			state.tags.insert(tag_id, name.to_string());

			Tag { tag_id, name: name.to_string() }
		});

		Box::pin(async move { Ok(tag) })
	}
}

#[derive(Default)]
struct State {
	products: BTreeMap<i32, StoredProduct>,
	tags: BTreeMap<i32, String>,
}
impl State {
	fn product(&self, product_id: i32) -> Option<Product> {
		let stored = self.products.get(&product_id)?;
		let tags = stored
			.tag_ids
			.iter()
			.filter_map(|tag_id| {
				self.tags.get(tag_id).map(|name| Tag { tag_id: *tag_id, name: name.clone() })
			})
			.collect();

		Some(Product {
			product_id,
			name: stored.name.clone(),
			description: stored.description.clone(),
			tags,
		})
	}

	/// Sorted, deduplicated tag ids, or an error naming the unknown ones.
	fn checked_tag_ids(&self, tag_ids: &[i32]) -> Result<Vec<i32>> {
		let mut unique = tag_ids.to_vec();

		unique.sort_unstable();
		unique.dedup();

		let missing: Vec<i32> =
			unique.iter().copied().filter(|tag_id| !self.tags.contains_key(tag_id)).collect();

		if !missing.is_empty() {
			return Err(catalog::unknown_tags(&missing));
		}

		Ok(unique)
	}
}

struct StoredProduct {
	name: String,
	description: String,
	tag_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn seeded_products_keep_ids_and_sorted_tags() {
		let catalog = MemoryCatalog::with_products(vec![Product {
			product_id: 7,
			name: "Desk Lamp".to_string(),
			description: "Adjustable LED lamp.".to_string(),
			tags: vec![
				Tag { tag_id: 3, name: "Home Office".to_string() },
				Tag { tag_id: 1, name: "Electronics".to_string() },
			],
		}]);
		let product = catalog.get_product(7).await.expect("Lookup failed.").expect("Missing.");
		let tag_ids: Vec<i32> = product.tags.iter().map(|tag| tag.tag_id).collect();

		assert_eq!(tag_ids, vec![1, 3]);

		let tags = catalog.list_tags().await.expect("Listing failed.");

		assert_eq!(tags.len(), 2);
		assert_eq!(tags[0].tag_id, 1);
	}

	#[tokio::test]
	async fn new_ids_follow_the_largest_existing_id() {
		let catalog = MemoryCatalog::new();
		let first = catalog.insert_tag("Clothing").await.expect("Insert failed.");
		let second = catalog.insert_tag("Winter").await.expect("Insert failed.");

		assert_eq!((first.tag_id, second.tag_id), (1, 2));

		let draft = ProductDraft {
			name: "Hoodie".to_string(),
			description: "Warm fleece hoodie.".to_string(),
			tag_ids: vec![2, 1, 2],
		};
		let product = catalog.insert_product(&draft).await.expect("Insert failed.");

		assert_eq!(product.product_id, 1);
		assert_eq!(product.tags.iter().map(|tag| tag.tag_id).collect::<Vec<_>>(), vec![1, 2]);
	}
}
