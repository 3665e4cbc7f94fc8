use sqlx::{PgExecutor, Postgres, Transaction};

use crate::{
	Error, Result,
	models::{ProductRow, ProductTagRow, TagRow},
};

pub async fn list_products<'e, E>(executor: E) -> Result<Vec<ProductRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ProductRow>(
		"\
SELECT product_id, name, description
FROM products
ORDER BY product_id",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn get_product<'e, E>(executor: E, product_id: i32) -> Result<Option<ProductRow>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, ProductRow>(
		"\
SELECT product_id, name, description
FROM products
WHERE product_id = $1",
	)
	.bind(product_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Products carrying the tag, ordered by product id.
pub async fn list_products_by_tag<'e, E>(executor: E, tag_id: i32) -> Result<Vec<ProductRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ProductRow>(
		"\
SELECT p.product_id, p.name, p.description
FROM products p
JOIN product_tags pt ON pt.product_id = p.product_id
WHERE pt.tag_id = $1
ORDER BY p.product_id",
	)
	.bind(tag_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn list_product_tags<'e, E>(executor: E, product_ids: &[i32]) -> Result<Vec<ProductTagRow>>
where
	E: PgExecutor<'e>,
{
	if product_ids.is_empty() {
		return Ok(Vec::new());
	}

	let rows = sqlx::query_as::<_, ProductTagRow>(
		"\
SELECT pt.product_id, t.tag_id, t.name AS tag_name
FROM product_tags pt
JOIN tags t ON t.tag_id = pt.tag_id
WHERE pt.product_id = ANY($1)
ORDER BY pt.product_id, t.tag_id",
	)
	.bind(product_ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn list_tags<'e, E>(executor: E) -> Result<Vec<TagRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, TagRow>(
		"\
SELECT tag_id, name
FROM tags
ORDER BY tag_id",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn insert_tag<'e, E>(executor: E, name: &str) -> Result<TagRow>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, TagRow>(
		"\
INSERT INTO tags (name)
VALUES ($1)
RETURNING tag_id, name",
	)
	.bind(name)
	.fetch_one(executor)
	.await?;

	Ok(row)
}

pub async fn insert_product_tx(
	tx: &mut Transaction<'_, Postgres>,
	name: &str,
	description: &str,
) -> Result<ProductRow> {
	let row = sqlx::query_as::<_, ProductRow>(
		"\
INSERT INTO products (name, description)
VALUES ($1, $2)
RETURNING product_id, name, description",
	)
	.bind(name)
	.bind(description)
	.fetch_one(&mut **tx)
	.await?;

	Ok(row)
}

pub async fn update_product_tx(
	tx: &mut Transaction<'_, Postgres>,
	product_id: i32,
	name: &str,
	description: &str,
) -> Result<Option<ProductRow>> {
	let row = sqlx::query_as::<_, ProductRow>(
		"\
UPDATE products
SET name = $2, description = $3
WHERE product_id = $1
RETURNING product_id, name, description",
	)
	.bind(product_id)
	.bind(name)
	.bind(description)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(row)
}

/// Replaces every association of the product. Unknown tag ids fail the call before anything is
/// written.
pub async fn replace_product_tags_tx(
	tx: &mut Transaction<'_, Postgres>,
	product_id: i32,
	tag_ids: &[i32],
) -> Result<()> {
	let mut unique = tag_ids.to_vec();

	unique.sort_unstable();
	unique.dedup();

	if !unique.is_empty() {
		let known: Vec<i32> =
			sqlx::query_scalar("SELECT tag_id FROM tags WHERE tag_id = ANY($1) ORDER BY tag_id")
				.bind(&unique)
				.fetch_all(&mut **tx)
				.await?;
		let missing: Vec<String> = unique
			.iter()
			.filter(|tag_id| !known.contains(tag_id))
			.map(|tag_id| tag_id.to_string())
			.collect();

		if !missing.is_empty() {
			return Err(Error::InvalidArgument(format!(
				"Unknown tag ids: {}.",
				missing.join(", ")
			)));
		}
	}

	sqlx::query("DELETE FROM product_tags WHERE product_id = $1")
		.bind(product_id)
		.execute(&mut **tx)
		.await?;

	if unique.is_empty() {
		return Ok(());
	}

	sqlx::query(
		"\
INSERT INTO product_tags (product_id, tag_id)
SELECT $1, tag_id
FROM unnest($2::int4[]) AS tag_id",
	)
	.bind(product_id)
	.bind(&unique)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

/// Returns whether a row was removed. Associations go with it through the cascade.
pub async fn delete_product<'e, E>(executor: E, product_id: i32) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
		.bind(product_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}
