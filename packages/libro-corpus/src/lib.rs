pub mod models;
pub mod parse;
pub mod store;

mod error;

pub use error::Error;
pub use models::{Chunk, Corpus, DropCounts};
pub use store::ChunkStore;

pub type Result<T, E = Error> = std::result::Result<T, E>;
