use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgExecutor;

use crate::{BoxFuture, CatalogStore, Error, Result, ShelfService};
use shelf_domain::catalog::{self, Product, RejectCode, Tag};
use shelf_storage::{db::Db, models::ProductRow, queries};

/// Fields of a product write. `tag_ids` is the complete tag set.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductDraft {
	pub name: String,
	pub description: String,
	#[serde(default)]
	pub tag_ids: Vec<i32>,
}

impl ShelfService {
	pub async fn list_products(&self) -> Result<Vec<Product>> {
		self.catalog.list_products().await
	}

	pub async fn get_product(&self, product_id: i32) -> Result<Product> {
		self.catalog.get_product(product_id).await?.ok_or_else(|| product_not_found(product_id))
	}

	/// Products carrying the tag, or the whole catalog without one.
	pub async fn list_products_by_tag(&self, tag_id: Option<i32>) -> Result<Vec<Product>> {
		match tag_id {
			Some(tag_id) => self.catalog.list_products_by_tag(tag_id).await,
			None => self.catalog.list_products().await,
		}
	}

	pub async fn list_tags(&self) -> Result<Vec<Tag>> {
		self.catalog.list_tags().await
	}

	pub async fn add_product(&self, draft: ProductDraft) -> Result<Product> {
		let draft = normalize_draft(draft)?;
		let product = self.catalog.insert_product(&draft).await?;

		tracing::info!(product_id = product.product_id, tags = product.tags.len(), "Product added.");

		Ok(product)
	}

	pub async fn update_product(&self, product_id: i32, draft: ProductDraft) -> Result<Product> {
		let draft = normalize_draft(draft)?;
		let product = self
			.catalog
			.update_product(product_id, &draft)
			.await?
			.ok_or_else(|| product_not_found(product_id))?;

		tracing::info!(product_id, tags = product.tags.len(), "Product updated.");

		Ok(product)
	}

	/// Returns whether a product was removed. Deleting a missing product is not an error.
	pub async fn delete_product(&self, product_id: i32) -> Result<bool> {
		let deleted = self.catalog.delete_product(product_id).await?;

		tracing::info!(product_id, deleted, "Product delete processed.");

		Ok(deleted)
	}

	pub async fn add_tag(&self, name: &str) -> Result<Tag> {
		let name = name.trim();

		catalog::check_tag(name).map_err(|(field, code)| reject(field, code))?;

		self.catalog.insert_tag(name).await
	}
}

impl CatalogStore for Db {
	fn list_products(&self) -> BoxFuture<'_, Result<Vec<Product>>> {
		Box::pin(async move {
			let rows = queries::list_products(&self.pool).await?;

			with_tags(&self.pool, rows).await
		})
	}

	fn get_product(&self, product_id: i32) -> BoxFuture<'_, Result<Option<Product>>> {
		Box::pin(async move {
			let Some(row) = queries::get_product(&self.pool, product_id).await? else {
				return Ok(None);
			};

			Ok(with_tags(&self.pool, vec![row]).await?.pop())
		})
	}

	fn list_products_by_tag(&self, tag_id: i32) -> BoxFuture<'_, Result<Vec<Product>>> {
		Box::pin(async move {
			let rows = queries::list_products_by_tag(&self.pool, tag_id).await?;

			with_tags(&self.pool, rows).await
		})
	}

	fn list_tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>> {
		Box::pin(async move {
			let rows = queries::list_tags(&self.pool).await?;

			Ok(rows.into_iter().map(|row| Tag { tag_id: row.tag_id, name: row.name }).collect())
		})
	}

	fn insert_product<'a>(&'a self, draft: &'a ProductDraft) -> BoxFuture<'a, Result<Product>> {
		Box::pin(async move {
			let mut tx = self.pool.begin().await?;
			let row = queries::insert_product_tx(&mut tx, &draft.name, &draft.description).await?;

			queries::replace_product_tags_tx(&mut tx, row.product_id, &draft.tag_ids).await?;

			let mut products = with_tags(&mut *tx, vec![row]).await?;

			tx.commit().await?;

			products.pop().ok_or_else(|| Error::Storage {
				message: "Inserted product could not be read back.".to_string(),
			})
		})
	}

	fn update_product<'a>(
		&'a self,
		product_id: i32,
		draft: &'a ProductDraft,
	) -> BoxFuture<'a, Result<Option<Product>>> {
		Box::pin(async move {
			let mut tx = self.pool.begin().await?;
			let Some(row) =
				queries::update_product_tx(&mut tx, product_id, &draft.name, &draft.description)
					.await?
			else {
				return Ok(None);
			};

			queries::replace_product_tags_tx(&mut tx, product_id, &draft.tag_ids).await?;

			let mut products = with_tags(&mut *tx, vec![row]).await?;

			tx.commit().await?;

			Ok(products.pop())
		})
	}

	fn delete_product(&self, product_id: i32) -> BoxFuture<'_, Result<bool>> {
		Box::pin(async move { Ok(queries::delete_product(&self.pool, product_id).await?) })
	}

	fn insert_tag<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Tag>> {
		Box::pin(async move {
			let row = queries::insert_tag(&self.pool, name).await?;

			Ok(Tag { tag_id: row.tag_id, name: row.name })
		})
	}
}

pub(crate) fn product_not_found(product_id: i32) -> Error {
	Error::NotFound { message: format!("Product {product_id} does not exist.") }
}

pub(crate) fn unknown_tags(tag_ids: &[i32]) -> Error {
	let ids: Vec<String> = tag_ids.iter().map(|tag_id| tag_id.to_string()).collect();

	Error::InvalidRequest { message: format!("Unknown tag ids: {}.", ids.join(", ")) }
}

fn reject(field: &str, code: RejectCode) -> Error {
	Error::InvalidRequest { message: format!("{field} rejected with {}.", code.as_str()) }
}

fn normalize_draft(draft: ProductDraft) -> Result<ProductDraft> {
	let name = draft.name.trim().to_string();
	let description = draft.description.trim().to_string();

	catalog::check_product(&name, &description).map_err(|(field, code)| reject(field, code))?;

	Ok(ProductDraft { name, description, tag_ids: draft.tag_ids })
}

async fn with_tags<'e, E>(executor: E, rows: Vec<ProductRow>) -> Result<Vec<Product>>
where
	E: PgExecutor<'e>,
{
	let ids: Vec<i32> = rows.iter().map(|row| row.product_id).collect();
	let mut tags_by_product: HashMap<i32, Vec<Tag>> = HashMap::new();

	for tag in queries::list_product_tags(executor, &ids).await? {
		tags_by_product
			.entry(tag.product_id)
			.or_default()
			.push(Tag { tag_id: tag.tag_id, name: tag.tag_name });
	}

	Ok(rows
		.into_iter()
		.map(|row| Product {
			tags: tags_by_product.remove(&row.product_id).unwrap_or_default(),
			product_id: row.product_id,
			name: row.name,
			description: row.description,
		})
		.collect())
}
