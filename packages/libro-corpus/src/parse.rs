use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::{Chunk, Corpus, Error, Result};

const DEFAULT_SOURCE: &str = "Libro";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArtifactFormat {
	JsonArray,
	JsonLines,
}

#[derive(Debug, Deserialize)]
struct RawChunk {
	#[serde(default, alias = "_id", alias = "chunk_id")]
	id: Option<Value>,
	#[serde(default)]
	source: Option<String>,
	#[serde(default)]
	page: Option<i64>,
	#[serde(default, alias = "chunk_index")]
	sequence_index: Option<u64>,
	#[serde(default)]
	text: Option<String>,
	#[serde(default)]
	embedding: Option<Value>,
}

pub fn detect_format(content: &str) -> ArtifactFormat {
	if content.trim_start_matches('\u{feff}').trim().starts_with('[') {
		ArtifactFormat::JsonArray
	} else {
		ArtifactFormat::JsonLines
	}
}

/// Parses artifact text into a validated corpus.
///
/// Invalid JSON anywhere fails the whole load. Well-formed records that do not describe a usable
/// chunk are dropped and counted instead.
pub fn parse_corpus(
	path: &Path,
	content: &str,
	expected_dimensions: Option<usize>,
) -> Result<Corpus> {
	let records = parse_records(path, content)?;
	let mut malformed = 0_usize;
	let mut chunks = Vec::with_capacity(records.len());

	for (ordinal, record) in records.into_iter().enumerate() {
		match serde_json::from_value::<RawChunk>(record) {
			Ok(raw) => chunks.push(into_chunk(raw, ordinal)),
			Err(_) => malformed += 1,
		}
	}

	let mut corpus = Corpus::from_chunks(path, chunks, expected_dimensions);

	corpus.dropped.malformed = malformed;
	corpus.fingerprint = blake3::hash(content.as_bytes()).to_hex().to_string();

	Ok(corpus)
}

fn parse_records(path: &Path, content: &str) -> Result<Vec<Value>> {
	let trimmed = content.trim_start_matches('\u{feff}').trim();

	match detect_format(trimmed) {
		ArtifactFormat::JsonArray => serde_json::from_str::<Vec<Value>>(trimmed).map_err(|err| {
			Error::Parse { path: path.to_path_buf(), line: err.line(), source: err }
		}),
		ArtifactFormat::JsonLines => {
			let mut records = Vec::new();

			for (index, line) in content.trim_start_matches('\u{feff}').lines().enumerate() {
				let line = line.trim();

				if line.is_empty() {
					continue;
				}

				let record = serde_json::from_str::<Value>(line).map_err(|err| Error::Parse {
					path: path.to_path_buf(),
					line: index + 1,
					source: err,
				})?;

				records.push(record);
			}

			Ok(records)
		},
	}
}

fn into_chunk(raw: RawChunk, ordinal: usize) -> Chunk {
	let id = match raw.id {
		Some(Value::String(id)) if !id.trim().is_empty() => id,
		Some(Value::Number(id)) => id.to_string(),
		_ => format!("chunk-{ordinal}"),
	};
	let source = raw
		.source
		.filter(|source| !source.trim().is_empty())
		.unwrap_or_else(|| DEFAULT_SOURCE.to_string());

	Chunk {
		id,
		source,
		page: raw.page,
		sequence_index: raw.sequence_index,
		text: raw.text.unwrap_or_default(),
		embedding: raw.embedding.as_ref().and_then(parse_embedding).unwrap_or_default(),
	}
}

fn parse_embedding(value: &Value) -> Option<Vec<f32>> {
	let items = value.as_array()?;
	let mut out = Vec::with_capacity(items.len());

	for item in items {
		// Finite f64 values beyond the f32 range turn into infinities here.
		let number = item.as_f64()? as f32;

		if !number.is_finite() {
			return None;
		}

		out.push(number);
	}

	Some(out)
}
