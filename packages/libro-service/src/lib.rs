pub mod ask;
pub mod compose;
pub mod corpus_admin;
pub mod gate;
pub mod outcome;
pub mod ranking;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use ask::{AskRequest, AskResponse};
pub use corpus_admin::CorpusStatus;
pub use error::{Error, Result};
pub use outcome::{Citation, DeflectionReason, RetrievalOutcome};

use libro_config::{ChatProviderConfig, Config, EmbeddingProviderConfig};
use libro_corpus::{ChunkStore, Corpus};
use libro_providers::{
	chat::{self, ChatMessage},
	embedding::{self, EmbedMode},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
		mode: EmbedMode,
	) -> BoxFuture<'a, libro_providers::Result<Vec<Vec<f32>>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, libro_providers::Result<Option<String>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub chat: Arc<dyn ChatProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, chat: Arc<dyn ChatProvider>) -> Self {
		Self { embedding, chat }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), chat: provider }
	}
}

pub struct LibroService {
	pub cfg: Config,
	pub store: Arc<ChunkStore>,
	pub providers: Providers,
}
impl LibroService {
	pub fn new(cfg: Config) -> Self {
		let store = ChunkStore::from_config(&cfg);

		Self::with_providers(cfg, store, Providers::default())
	}

	pub fn with_providers(cfg: Config, store: ChunkStore, providers: Providers) -> Self {
		Self { cfg, store: Arc::new(store), providers }
	}

	/// Returns the cached corpus, reading the artifact on a blocking thread when it is not loaded.
	pub async fn load_corpus(&self) -> Result<Arc<Corpus>> {
		if let Some(corpus) = self.store.cached() {
			return Ok(corpus);
		}

		let store = self.store.clone();

		run_blocking(move || store.load()).await
	}
}

pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
	T: Send + 'static,
	F: FnOnce() -> libro_corpus::Result<T> + Send + 'static,
{
	let joined = tokio::task::spawn_blocking(f)
		.await
		.map_err(|err| Error::Internal { message: format!("Corpus task failed: {err}") })?;

	Ok(joined?)
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
		mode: EmbedMode,
	) -> BoxFuture<'a, libro_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts, mode))
	}
}
impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, libro_providers::Result<Option<String>>> {
		Box::pin(chat::complete(cfg, messages))
	}
}
