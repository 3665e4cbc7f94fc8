#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
	pub product_id: i32,
	pub name: String,
	pub description: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagRow {
	pub tag_id: i32,
	pub name: String,
}

/// One product-to-tag association joined with the tag name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductTagRow {
	pub product_id: i32,
	pub tag_id: i32,
	pub tag_name: String,
}
