use serde_json::Value;

use crate::ShelfService;
use shelf_config::INTERPRETER_TOKENIZE;
use shelf_domain::criteria::{self, SearchCriteria};

impl ShelfService {
	/// Turns a free-text query into search criteria.
	///
	/// Never fails: provider errors and unusable responses fall back to the raw query words.
	pub async fn interpret(&self, raw_query: &str) -> SearchCriteria {
		if raw_query.trim().is_empty() {
			return SearchCriteria::default();
		}
		if self.cfg.search.interpreter == INTERPRETER_TOKENIZE {
			return SearchCriteria::from_query(raw_query);
		}

		let messages = build_interpreter_messages(raw_query);
		let response = match self
			.providers
			.completion
			.complete(&self.cfg.providers.llm_interpreter, &messages)
			.await
		{
			Ok(response) => response,
			Err(err) => {
				tracing::warn!(error = %err, "Query interpreter call failed. Using raw query words.");

				return SearchCriteria::from_query(raw_query);
			},
		};

		match criteria::parse_response(&response) {
			Ok(criteria) => criteria,
			Err(err) => {
				tracing::warn!(
					error = %err,
					response_len = response.len(),
					"Query interpreter response is unusable. Using raw query words."
				);

				SearchCriteria::from_query(raw_query)
			},
		}
	}
}

fn build_interpreter_messages(query: &str) -> Vec<Value> {
	let schema = serde_json::json!({
		"searchTerms": ["string"],
		"categories": ["string"],
		"importance": "searchTerms | categories"
	});
	let schema_text = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| {
		"{\"searchTerms\": [\"string\"], \"categories\": [\"string\"], \"importance\": \"searchTerms | categories\"}"
			.to_string()
	});
	let system_prompt = "You extract product search criteria from shopper queries. \
Output must be valid JSON only and must match the provided schema exactly. \
searchTerms holds words to look for in product names and descriptions. \
categories holds product categories the shopper asks for. \
importance is searchTerms when the words matter most and categories otherwise. \
Do not add explanations or extra fields.";
	let user_prompt =
		format!("Return JSON matching this exact schema:\n{schema_text}\nShopper query:\n{query}");

	vec![
		serde_json::json!({ "role": "system", "content": system_prompt }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}
