use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};
use libro_config::EmbeddingProviderConfig;

/// Which side of the retrieval pair a text is embedded for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedMode {
	Query,
	Document,
}
impl EmbedMode {
	pub fn prefix(self, cfg: &EmbeddingProviderConfig) -> &str {
		match self {
			Self::Query => cfg.query_prefix.as_str(),
			Self::Document => cfg.document_prefix.as_str(),
		}
	}
}

pub async fn embed(
	cfg: &EmbeddingProviderConfig,
	texts: &[String],
	mode: EmbedMode,
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": prefixed_inputs(cfg, texts, mode),
	});

	tracing::debug!(provider_id = %cfg.provider_id, inputs = texts.len(), ?mode, "Requesting embeddings.");

	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let vectors = parse_embedding_response(json)?;

	check_shape(&vectors, texts.len(), cfg.dimensions as usize)?;

	Ok(vectors)
}

pub fn prefixed_inputs(cfg: &EmbeddingProviderConfig, texts: &[String], mode: EmbedMode) -> Vec<String> {
	let prefix = mode.prefix(cfg);

	texts.iter().map(|text| format!("{prefix}{text}")).collect()
}

/// Accepts `{data: [{index, embedding}]}`, `{data: [{vector}]}` and a bare `{embedding}`.
fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	if let Some(data) = json.get("data").and_then(|v| v.as_array()) {
		let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

		for (fallback_index, item) in data.iter().enumerate() {
			let index = item
				.get("index")
				.and_then(|v| v.as_u64())
				.map(|v| v as usize)
				.unwrap_or(fallback_index);
			let embedding = item
				.get("embedding")
				.or_else(|| item.get("vector"))
				.ok_or_else(|| Error::invalid_response("Embedding item missing embedding array."))?;

			indexed.push((index, parse_vector(embedding)?));
		}

		indexed.sort_by_key(|(index, _)| *index);

		return Ok(indexed.into_iter().map(|(_, vec)| vec).collect());
	}
	if let Some(embedding) = json.get("embedding") {
		return Ok(vec![parse_vector(embedding)?]);
	}

	Err(Error::invalid_response("Embedding response is missing data array."))
}

fn parse_vector(value: &Value) -> Result<Vec<f32>> {
	let items =
		value.as_array().ok_or_else(|| Error::invalid_response("Embedding must be an array."))?;
	let mut vec = Vec::with_capacity(items.len());

	for item in items {
		let number =
			item.as_f64().ok_or_else(|| Error::invalid_response("Embedding value must be numeric."))?;
		let number = number as f32;

		if !number.is_finite() {
			return Err(Error::invalid_response("Embedding value must be a finite f32."));
		}

		vec.push(number);
	}

	Ok(vec)
}

fn check_shape(vectors: &[Vec<f32>], expected_count: usize, dimensions: usize) -> Result<()> {
	if vectors.len() != expected_count {
		return Err(Error::invalid_response(format!(
			"Embedding response has {} vectors for {expected_count} inputs.",
			vectors.len()
		)));
	}

	for vec in vectors {
		if vec.len() != dimensions {
			return Err(Error::invalid_response(format!(
				"Embedding has {} dimensions; expected {dimensions}.",
				vec.len()
			)));
		}
	}

	Ok(())
}
