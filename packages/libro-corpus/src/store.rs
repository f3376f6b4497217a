use std::{
	fs,
	path::{Path, PathBuf},
	sync::{Arc, PoisonError, RwLock},
};

use crate::{Corpus, Error, Result, parse};

/// Lazily loaded, write-once cache over a corpus artifact.
///
/// The first successful [`ChunkStore::load`] fixes the corpus for every later caller until
/// [`ChunkStore::invalidate`] or [`ChunkStore::reload`]. Failed loads are not cached.
pub struct ChunkStore {
	path: PathBuf,
	expected_dimensions: Option<usize>,
	slot: RwLock<Option<Arc<Corpus>>>,
}
impl ChunkStore {
	pub fn new(path: impl Into<PathBuf>, expected_dimensions: Option<usize>) -> Self {
		Self { path: path.into(), expected_dimensions, slot: RwLock::new(None) }
	}

	pub fn from_config(cfg: &libro_config::Config) -> Self {
		Self::new(
			cfg.corpus.path.clone(),
			Some(cfg.providers.embedding.dimensions as usize),
		)
	}

	/// A store that starts out loaded, for callers that build chunks in memory.
	pub fn preloaded(corpus: Corpus) -> Self {
		let expected_dimensions = (corpus.dimensions > 0).then_some(corpus.dimensions);

		Self {
			path: corpus.path.clone(),
			expected_dimensions,
			slot: RwLock::new(Some(Arc::new(corpus))),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn cached(&self) -> Option<Arc<Corpus>> {
		self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
	}

	pub fn load(&self) -> Result<Arc<Corpus>> {
		if let Some(corpus) = self.cached() {
			return Ok(corpus);
		}

		let corpus = Arc::new(self.read_from_disk()?);
		let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);

		// Racing first loads parse twice; the first one stored is what everybody shares.
		Ok(slot.get_or_insert(corpus).clone())
	}

	/// Drops the cached corpus; the next [`ChunkStore::load`] reads the artifact again.
	pub fn invalidate(&self) -> Option<Arc<Corpus>> {
		let previous = self.slot.write().unwrap_or_else(PoisonError::into_inner).take();

		if previous.is_some() {
			tracing::info!(corpus.path = %self.path.display(), "Corpus cache invalidated.");
		}

		previous
	}

	/// Reads the artifact and swaps it in. On failure the previous corpus stays active.
	pub fn reload(&self) -> Result<Arc<Corpus>> {
		let corpus = Arc::new(self.read_from_disk()?);

		*self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(corpus.clone());

		Ok(corpus)
	}

	fn read_from_disk(&self) -> Result<Corpus> {
		if !self.path.exists() {
			return Err(Error::NotFound { path: self.path.clone() });
		}

		let bytes =
			fs::read(&self.path).map_err(|err| Error::Read { path: self.path.clone(), source: err })?;
		let content = String::from_utf8(bytes).map_err(|err| Error::Read {
			path: self.path.clone(),
			source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
		})?;
		let corpus = parse::parse_corpus(&self.path, &content, self.expected_dimensions)?;

		if corpus.dropped.total() > 0 {
			tracing::warn!(
				corpus.path = %self.path.display(),
				malformed = corpus.dropped.malformed,
				missing_embedding = corpus.dropped.missing_embedding,
				empty_text = corpus.dropped.empty_text,
				dimension_mismatch = corpus.dropped.dimension_mismatch,
				"Dropped unusable corpus records."
			);
		}

		tracing::info!(
			corpus.path = %self.path.display(),
			chunks = corpus.len(),
			dimensions = corpus.dimensions,
			fingerprint = &corpus.fingerprint[..corpus.fingerprint.len().min(12)],
			"Corpus loaded."
		);

		Ok(corpus)
	}
}
