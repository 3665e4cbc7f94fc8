//! Structured search criteria and the sanitation of text-generation responses that carry them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
	#[default]
	KeywordsFirst,
	CategoriesFirst,
}
impl Priority {
	/// Maps the `importance` field of an interpreter response. Only `searchTerms` keeps keyword
	/// matches in front; every other label hands the lead to categories.
	pub fn from_importance(importance: &str) -> Self {
		if importance.trim().eq_ignore_ascii_case("searchTerms") {
			Self::KeywordsFirst
		} else {
			Self::CategoriesFirst
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
	pub terms: Vec<String>,
	pub categories: Vec<String>,
	pub priority: Priority,
}
impl SearchCriteria {
	/// Builds criteria, splitting every entry on whitespace and discarding empty segments.
	pub fn new<T, C>(terms: T, categories: C, priority: Priority) -> Self
	where
		T: IntoIterator,
		T::Item: AsRef<str>,
		C: IntoIterator,
		C::Item: AsRef<str>,
	{
		Self { terms: split_words(terms), categories: split_words(categories), priority }
	}

	/// Raw query words as terms, no categories, keywords first.
	pub fn from_query(query: &str) -> Self {
		Self::new([query], std::iter::empty::<&str>(), Priority::KeywordsFirst)
	}

	pub fn is_empty(&self) -> bool {
		self.terms.is_empty() && self.categories.is_empty()
	}
}

#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
	#[error("Interpreter response does not contain a JSON object.")]
	MissingObject,
	#[error("Interpreter response is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Interpreter response field {field} has an unexpected shape.")]
	InvalidField { field: &'static str },
}

/// Strips markdown fences and slices the text from the first `{` to the last `}`.
///
/// A blank response yields `{}`. `None` means the text holds no brace pair at all.
pub fn sanitize_response(text: &str) -> Option<String> {
	if text.trim().is_empty() {
		return Some("{}".to_string());
	}

	let stripped = Regex::new(r"```(?:json)?\s*")
		.map(|re| re.replace_all(text, "").into_owned())
		.unwrap_or_else(|_| text.to_string());
	let first = stripped.find('{')?;
	let last = stripped.rfind('}')?;

	if last <= first {
		return None;
	}

	Some(stripped[first..=last].to_string())
}

/// Parses an interpreter response into criteria.
///
/// Field names match case-insensitively and ignore underscores, so `searchTerms`,
/// `SearchTerms` and `search_terms` are the same field. Missing or null fields keep their
/// defaults.
pub fn parse_response(text: &str) -> Result<SearchCriteria, CriteriaError> {
	let sanitized = sanitize_response(text).ok_or(CriteriaError::MissingObject)?;
	let value: Value = serde_json::from_str(&sanitized)?;
	let Value::Object(fields) = value else {
		return Err(CriteriaError::MissingObject);
	};
	let mut terms = Vec::new();
	let mut categories = Vec::new();
	let mut priority = Priority::KeywordsFirst;

	for (key, value) in fields {
		match normalize_key(&key).as_str() {
			"searchterms" => terms = string_list(value, "searchTerms")?,
			"categories" => categories = string_list(value, "categories")?,
			"importance" => match value {
				Value::String(importance) => priority = Priority::from_importance(&importance),
				Value::Null => {},
				_ => return Err(CriteriaError::InvalidField { field: "importance" }),
			},
			_ => {},
		}
	}

	Ok(SearchCriteria::new(terms, categories, priority))
}

fn normalize_key(key: &str) -> String {
	key.chars().filter(|ch| *ch != '_').flat_map(char::to_lowercase).collect()
}

fn string_list(value: Value, field: &'static str) -> Result<Vec<String>, CriteriaError> {
	match value {
		Value::Null => Ok(Vec::new()),
		Value::Array(items) => items
			.into_iter()
			.map(|item| match item {
				Value::String(text) => Ok(text),
				_ => Err(CriteriaError::InvalidField { field }),
			})
			.collect(),
		_ => Err(CriteriaError::InvalidField { field }),
	}
}

fn split_words<I>(values: I) -> Vec<String>
where
	I: IntoIterator,
	I::Item: AsRef<str>,
{
	let mut out = Vec::new();

	for value in values {
		out.extend(value.as_ref().split_whitespace().map(str::to_string));
	}

	out
}
