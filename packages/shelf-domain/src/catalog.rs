use serde::{Deserialize, Serialize};

pub const MAX_PRODUCT_NAME_CHARS: usize = 255;
pub const MAX_TAG_NAME_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
	pub tag_id: i32,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
	pub product_id: i32,
	pub name: String,
	pub description: String,
	#[serde(default)]
	pub tags: Vec<Tag>,
}
impl Product {
	pub fn has_tag(&self, tag_id: i32) -> bool {
		self.tags.iter().any(|tag| tag.tag_id == tag_id)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
	RejectEmpty,
	RejectTooLong,
}
impl RejectCode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::RejectEmpty => "REJECT_EMPTY",
			Self::RejectTooLong => "REJECT_TOO_LONG",
		}
	}
}

/// Checks the fields of a product before it is written to the catalog.
pub fn check_product(name: &str, description: &str) -> Result<(), (&'static str, RejectCode)> {
	if name.trim().is_empty() {
		return Err(("name", RejectCode::RejectEmpty));
	}
	if name.chars().count() > MAX_PRODUCT_NAME_CHARS {
		return Err(("name", RejectCode::RejectTooLong));
	}
	if description.trim().is_empty() {
		return Err(("description", RejectCode::RejectEmpty));
	}

	Ok(())
}

pub fn check_tag(name: &str) -> Result<(), (&'static str, RejectCode)> {
	if name.trim().is_empty() {
		return Err(("name", RejectCode::RejectEmpty));
	}
	if name.chars().count() > MAX_TAG_NAME_CHARS {
		return Err(("name", RejectCode::RejectTooLong));
	}

	Ok(())
}
