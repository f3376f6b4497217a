pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Corpus error: {0}")]
	Corpus(#[from] libro_corpus::Error),
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl Error {
	pub(crate) fn provider(message: impl Into<String>) -> Self {
		Self::Provider { message: message.into() }
	}
}

impl From<libro_providers::Error> for Error {
	fn from(err: libro_providers::Error) -> Self {
		if err.is_timeout() {
			return Self::Provider { message: format!("Request timed out: {err}") };
		}

		Self::Provider { message: err.to_string() }
	}
}
