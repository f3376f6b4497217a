use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Corpus artifact not found at {path:?}.")]
	NotFound { path: PathBuf },
	#[error("Failed to read corpus artifact at {path:?}.")]
	Read { path: PathBuf, source: std::io::Error },
	#[error("Failed to parse corpus artifact at {path:?}, line {line}.")]
	Parse { path: PathBuf, line: usize, source: serde_json::Error },
}
