use std::path::PathBuf;

use serde::Serialize;

/// One embedded passage of a source document.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
	pub id: String,
	pub source: String,
	pub page: Option<i64>,
	/// Position of the chunk inside its source document. Not used for ranking.
	pub sequence_index: Option<u64>,
	pub text: String,
	pub embedding: Vec<f32>,
}

/// Records filtered out while loading, by reason.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DropCounts {
	pub malformed: usize,
	pub missing_embedding: usize,
	pub empty_text: usize,
	pub dimension_mismatch: usize,
}
impl DropCounts {
	pub fn total(&self) -> usize {
		self.malformed + self.missing_embedding + self.empty_text + self.dimension_mismatch
	}
}

/// Immutable, fully validated chunk set.
///
/// Every chunk holds a non-empty embedding of exactly `dimensions` values.
#[derive(Debug)]
pub struct Corpus {
	pub path: PathBuf,
	pub chunks: Vec<Chunk>,
	pub dimensions: usize,
	pub dropped: DropCounts,
	/// blake3 hex digest of the artifact bytes.
	pub fingerprint: String,
}
impl Corpus {
	/// Builds a corpus from in-memory chunks, applying the same filtering as a file load.
	pub fn from_chunks(
		path: impl Into<PathBuf>,
		chunks: Vec<Chunk>,
		expected_dimensions: Option<usize>,
	) -> Self {
		let mut dropped = DropCounts::default();
		let mut dimensions = expected_dimensions;
		let mut kept = Vec::with_capacity(chunks.len());

		for chunk in chunks {
			if chunk.embedding.is_empty() {
				dropped.missing_embedding += 1;

				continue;
			}
			if chunk.text.trim().is_empty() {
				dropped.empty_text += 1;

				continue;
			}

			let expected = *dimensions.get_or_insert(chunk.embedding.len());

			if chunk.embedding.len() != expected {
				dropped.dimension_mismatch += 1;

				continue;
			}

			kept.push(chunk);
		}

		Self {
			path: path.into(),
			chunks: kept,
			dimensions: dimensions.unwrap_or(0),
			dropped,
			fingerprint: String::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.chunks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}
}
