use shelf_domain::{
	catalog::{Product, Tag},
	criteria::{self, Priority, SearchCriteria},
	matcher, merge,
	vision::{DetectedObject, ImageAnalysis, ImageLabel},
};

fn tag(tag_id: i32, name: &str) -> Tag {
	Tag { tag_id, name: name.to_string() }
}

fn product(product_id: i32, name: &str, description: &str, tags: Vec<Tag>) -> Product {
	Product { product_id, name: name.to_string(), description: description.to_string(), tags }
}

fn sample_catalog() -> Vec<Product> {
	vec![
		product(
			1,
			"Laptop",
			"High-performance laptop with 16GB RAM and 512GB SSD.",
			vec![tag(1, "Electronics")],
		),
		product(2, "T-Shirt", "Cotton t-shirt available in multiple colors.", vec![tag(2, "Clothing")]),
		product(
			3,
			"Desk Lamp",
			"Adjustable LED lamp, handy next to a laptop.",
			vec![tag(1, "Electronics"), tag(3, "Home Office")],
		),
		product(4, "Hoodie", "Warm fleece hoodie.", vec![tag(2, "Clothing"), tag(4, "Winter")]),
	]
}

fn ids(products: &[Product]) -> Vec<i32> {
	products.iter().map(|product| product.product_id).collect()
}

#[test]
fn keyword_query_matches_name_case_insensitively() {
	let catalog = vec![
		product(1, "Laptop", "High-performance laptop...", vec![tag(1, "Electronics")]),
		product(2, "T-Shirt", "Cotton t-shirt...", vec![tag(2, "Clothing")]),
	];

	assert_eq!(ids(&matcher::find_products_by_query(&catalog, "laptop")), vec![1]);
	assert_eq!(ids(&matcher::find_products_by_query(&catalog, "LAPTOP")), vec![1]);
	assert!(matcher::find_products_by_query(&catalog, "shoes").is_empty());
}

#[test]
fn category_only_criteria_match_tags() {
	let catalog = vec![
		product(1, "Laptop", "High-performance laptop...", vec![tag(1, "Electronics")]),
		product(2, "T-Shirt", "Cotton t-shirt...", vec![tag(2, "Clothing")]),
	];
	let criteria =
		SearchCriteria::new(Vec::<String>::new(), ["Electronics"], Priority::KeywordsFirst);

	assert_eq!(ids(&matcher::find_products(&catalog, &criteria)), vec![1]);
}

#[test]
fn category_fragments_match_inside_tag_names() {
	let criteria = SearchCriteria::new(Vec::<String>::new(), ["office"], Priority::KeywordsFirst);

	assert_eq!(ids(&matcher::find_products(&sample_catalog(), &criteria)), vec![3]);
}

#[test]
fn tag_names_are_not_searched_by_terms() {
	let found = matcher::find_products_by_query(&sample_catalog(), "winter");

	assert!(found.is_empty());
}

#[test]
fn empty_inputs_return_nothing() {
	let catalog = sample_catalog();

	assert!(matcher::find_products_by_query(&catalog, "").is_empty());
	assert!(matcher::find_products_by_query(&catalog, "   ").is_empty());
	assert!(matcher::find_products(&catalog, &SearchCriteria::default()).is_empty());
	assert!(matcher::find_products(&[], &SearchCriteria::from_query("laptop")).is_empty());
}

#[test]
fn keywords_first_puts_term_matches_before_category_only_matches() {
	let catalog = sample_catalog();
	let criteria = SearchCriteria::new(["cotton", "fleece"], ["electronics"], Priority::KeywordsFirst);
	let found = matcher::find_products(&catalog, &criteria);

	assert_eq!(ids(&found), vec![2, 4, 1, 3]);
}

#[test]
fn categories_first_puts_tag_matches_in_front() {
	let catalog = sample_catalog();
	let criteria = SearchCriteria::new(["laptop"], ["clothing"], Priority::CategoriesFirst);
	let found = matcher::find_products(&catalog, &criteria);

	assert_eq!(ids(&found), vec![2, 4, 1, 3]);
}

#[test]
fn products_in_both_sets_appear_once() {
	let catalog = sample_catalog();
	let criteria = SearchCriteria::new(["laptop"], ["electronics"], Priority::KeywordsFirst);
	let found = matcher::find_products(&catalog, &criteria);

	assert_eq!(ids(&found), vec![1, 3]);
}

#[test]
fn every_term_result_contains_a_term() {
	let catalog = sample_catalog();
	let terms = ["LED", "ram", "warm"];
	let found = matcher::find_products(
		&catalog,
		&SearchCriteria::new(terms, Vec::<String>::new(), Priority::KeywordsFirst),
	);

	assert!(!found.is_empty());

	for product in &found {
		let haystack = format!("{} {}", product.name, product.description).to_lowercase();

		assert!(terms.iter().any(|term| haystack.contains(&term.to_lowercase())));
	}
}

#[test]
fn malformed_interpreter_output_uses_query_words() {
	let raw_query = "warm cotton  shirt";
	let parsed = criteria::parse_response("not json");

	assert!(parsed.is_err());

	let fallback = SearchCriteria::from_query(raw_query);

	assert_eq!(fallback.terms, vec!["warm", "cotton", "shirt"]);
	assert!(fallback.categories.is_empty());
	assert_eq!(fallback.priority, Priority::KeywordsFirst);
}

#[test]
fn interpreter_output_in_fences_is_accepted() {
	let response = "```json\n{\n  \"searchTerms\": [\"wireless mouse\"],\n  \"categories\": [\"Electronics\"],\n  \"importance\": \"categories\"\n}\n```";
	let parsed = criteria::parse_response(response).expect("Fenced response must parse.");

	assert_eq!(parsed.terms, vec!["wireless", "mouse"]);
	assert_eq!(parsed.categories, vec!["Electronics"]);
	assert_eq!(parsed.priority, Priority::CategoriesFirst);
}

#[test]
fn merged_paths_keep_primary_order() {
	let catalog = sample_catalog();
	let keyword = vec![catalog[2].clone(), catalog[0].clone()];
	let vector = vec![catalog[0].clone(), catalog[3].clone(), catalog[3].clone()];

	assert_eq!(ids(&merge::merge_products(keyword.clone(), vector.clone())), vec![3, 1, 4]);
	assert_eq!(ids(&merge::merge_products(vector, keyword)), vec![1, 4, 3]);
}

#[test]
fn image_labels_become_a_keyword_query() {
	let analysis = ImageAnalysis::from_labels(
		Some("a red leather shoe on a table"),
		&[DetectedObject {
			labels: vec![ImageLabel { name: "shoe".to_string(), confidence: 0.92 }],
		}],
		&[
			ImageLabel { name: "red".to_string(), confidence: 0.95 },
			ImageLabel { name: "leather".to_string(), confidence: 0.81 },
			ImageLabel { name: "shoes".to_string(), confidence: 0.85 },
			ImageLabel { name: "Shoe".to_string(), confidence: 0.99 },
		],
	);

	assert_eq!(analysis.description, "a red leather shoe on a table");
	assert_eq!(analysis.objects, vec!["shoe"]);
	assert_eq!(analysis.characteristics, vec!["red", "leather"]);
	assert_eq!(analysis.candidate_categories, vec!["shoes"]);
	assert_eq!(analysis.search_query(), "shoe red leather shoes");
}

#[test]
fn failed_analysis_has_no_labels() {
	let analysis = ImageAnalysis::failed("Image analysis failed: timeout.");

	assert_eq!(analysis.description, "Image analysis failed: timeout.");
	assert!(analysis.search_terms().is_empty());
}
