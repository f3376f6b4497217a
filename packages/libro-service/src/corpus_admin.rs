use std::path::PathBuf;

use serde::Serialize;

use crate::{LibroService, Result};
use libro_corpus::{Corpus, DropCounts};

#[derive(Clone, Debug, Serialize)]
pub struct CorpusStatus {
	pub path: PathBuf,
	pub loaded: bool,
	pub chunks: usize,
	pub dimensions: usize,
	pub dropped: DropCounts,
	pub fingerprint: Option<String>,
}
impl CorpusStatus {
	fn unloaded(path: PathBuf) -> Self {
		Self {
			path,
			loaded: false,
			chunks: 0,
			dimensions: 0,
			dropped: DropCounts::default(),
			fingerprint: None,
		}
	}

	fn from_corpus(corpus: &Corpus) -> Self {
		Self {
			path: corpus.path.clone(),
			loaded: true,
			chunks: corpus.len(),
			dimensions: corpus.dimensions,
			dropped: corpus.dropped,
			fingerprint: Some(corpus.fingerprint.clone()).filter(|digest| !digest.is_empty()),
		}
	}
}

impl LibroService {
	/// Reports the cached corpus without triggering a load.
	pub fn corpus_status(&self) -> CorpusStatus {
		match self.store.cached() {
			Some(corpus) => CorpusStatus::from_corpus(&corpus),
			None => CorpusStatus::unloaded(self.store.path().to_path_buf()),
		}
	}

	/// Re-reads the artifact from disk. On failure the previously cached corpus stays active.
	pub async fn reload_corpus(&self) -> Result<CorpusStatus> {
		let store = self.store.clone();
		let corpus = crate::run_blocking(move || store.reload()).await?;

		tracing::info!(
			corpus.path = %corpus.path.display(),
			chunks = corpus.len(),
			fingerprint = %corpus.fingerprint,
			"Corpus reloaded."
		);

		Ok(CorpusStatus::from_corpus(&corpus))
	}
}
