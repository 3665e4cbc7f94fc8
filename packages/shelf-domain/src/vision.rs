//! Turns raw vision-service labels into product search hints.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub const CHARACTERISTIC_MIN_CONFIDENCE: f32 = 0.70;
pub const CATEGORY_MIN_CONFIDENCE: f32 = 0.80;

const COLORS: &[&str] = &[
	"beige", "black", "blue", "brown", "gold", "gray", "green", "grey", "navy", "orange", "pink",
	"purple", "red", "silver", "white", "yellow",
];
const MATERIALS: &[&str] = &[
	"bamboo", "ceramic", "cotton", "denim", "fabric", "glass", "leather", "linen", "metal",
	"plastic", "rubber", "silk", "steel", "stone", "wood", "wooden", "wool",
];
const STYLES: &[&str] = &[
	"casual", "classic", "elegant", "formal", "luxury", "minimalist", "modern", "outdoor", "retro",
	"rustic", "sporty", "vintage",
];
const CATEGORIES: &[&str] = &[
	"accessories",
	"appliance",
	"bag",
	"bicycle",
	"book",
	"books",
	"camera",
	"chair",
	"clothing",
	"computer",
	"dress",
	"electronics",
	"footwear",
	"furniture",
	"headphones",
	"jacket",
	"jewelry",
	"kitchen",
	"lamp",
	"laptop",
	"pants",
	"phone",
	"shirt",
	"shoes",
	"sports",
	"t-shirt",
	"table",
	"toy",
	"toys",
	"watch",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLabel {
	pub name: String,
	pub confidence: f32,
}

/// A detected region with every label the vision service proposed for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
	pub labels: Vec<ImageLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnalysis {
	pub description: String,
	pub objects: Vec<String>,
	pub characteristics: Vec<String>,
	pub candidate_categories: Vec<String>,
}
impl ImageAnalysis {
	pub fn from_labels(caption: Option<&str>, objects: &[DetectedObject], tags: &[ImageLabel]) -> Self {
		Self {
			description: caption.unwrap_or_default().trim().to_string(),
			objects: extract_objects(objects),
			characteristics: extract_characteristics(tags),
			candidate_categories: extract_categories(tags),
		}
	}

	/// A result that carries only a readable error in `description`.
	pub fn failed(message: impl Into<String>) -> Self {
		Self { description: message.into(), ..Default::default() }
	}

	/// Objects, characteristics and candidate categories, deduplicated case-insensitively in that
	/// order.
	pub fn search_terms(&self) -> Vec<String> {
		let mut seen = HashSet::new();

		self.objects
			.iter()
			.chain(&self.characteristics)
			.chain(&self.candidate_categories)
			.filter(|label| seen.insert(label.to_lowercase()))
			.cloned()
			.collect()
	}

	pub fn search_query(&self) -> String {
		self.search_terms().join(" ")
	}
}

/// The most confident label of every object, first detection wins on duplicates.
pub fn extract_objects(objects: &[DetectedObject]) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for object in objects {
		let Some(best) = object.labels.iter().fold(None::<&ImageLabel>, |best, label| match best {
			Some(current) if current.confidence >= label.confidence => Some(current),
			_ => Some(label),
		}) else {
			continue;
		};
		let name = best.name.trim();

		if name.is_empty() {
			continue;
		}
		if seen.insert(name.to_lowercase()) {
			out.push(name.to_string());
		}
	}

	out
}

pub fn extract_characteristics(tags: &[ImageLabel]) -> Vec<String> {
	filter_tags(tags, CHARACTERISTIC_MIN_CONFIDENCE, |name| {
		COLORS.contains(&name) || MATERIALS.contains(&name) || STYLES.contains(&name)
	})
}

pub fn extract_categories(tags: &[ImageLabel]) -> Vec<String> {
	filter_tags(tags, CATEGORY_MIN_CONFIDENCE, |name| CATEGORIES.contains(&name))
}

fn filter_tags<F>(tags: &[ImageLabel], min_confidence: f32, in_vocabulary: F) -> Vec<String>
where
	F: Fn(&str) -> bool,
{
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for tag in tags {
		if tag.confidence < min_confidence {
			continue;
		}

		let name = tag.name.trim().to_lowercase();

		if in_vocabulary(name.as_str()) && seen.insert(name.clone()) {
			out.push(name);
		}
	}

	out
}
