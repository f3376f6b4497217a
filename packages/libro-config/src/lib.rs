mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Assistant, ChatProviderConfig, Config, Corpus, DEFAULT_GREETINGS, DEFAULT_KEYWORDS,
	EmbeddingProviderConfig, Providers, Retrieval, Service, Snippet, Strategy, Topic,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;
	let mut cfg = parse(&raw).map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

/// Parses without validating; callers that build configs in memory still run [`validate`].
pub fn parse(raw: &str) -> std::result::Result<Config, toml::de::Error> {
	toml::from_str(raw)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::validation("service.http_bind must be non-empty."));
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::validation("service.admin_bind must be non-empty."));
	}
	if cfg.corpus.path.as_os_str().is_empty() {
		return Err(Error::validation("corpus.path must be non-empty."));
	}

	let embedding = &cfg.providers.embedding;

	if embedding.dimensions == 0 {
		return Err(Error::validation(
			"providers.embedding.dimensions must be greater than zero.",
		));
	}
	if embedding.timeout_ms == 0 {
		return Err(Error::validation("providers.embedding.timeout_ms must be greater than zero."));
	}
	if embedding.api_base.trim().is_empty() {
		return Err(Error::validation("providers.embedding.api_base must be non-empty."));
	}

	if let Some(chat) = cfg.providers.chat.as_ref() {
		if chat.timeout_ms == 0 {
			return Err(Error::validation("providers.chat.timeout_ms must be greater than zero."));
		}
		if !chat.temperature.is_finite() || chat.temperature < 0.0 {
			return Err(Error::validation(
				"providers.chat.temperature must be a finite number, zero or greater.",
			));
		}
		if chat.max_tokens == 0 {
			return Err(Error::validation("providers.chat.max_tokens must be greater than zero."));
		}
	} else if cfg.retrieval.strategy == Strategy::FreeGeneration {
		return Err(Error::validation(
			"providers.chat is required when retrieval.strategy is free_generation.",
		));
	}

	let retrieval = &cfg.retrieval;

	if retrieval.gate_k == 0 {
		return Err(Error::validation("retrieval.gate_k must be greater than zero."));
	}
	if retrieval.answer_k == 0 {
		return Err(Error::validation("retrieval.answer_k must be greater than zero."));
	}
	if retrieval.candidate_k < retrieval.gate_k.max(retrieval.answer_k) {
		return Err(Error::validation(
			"retrieval.candidate_k must be at least max(retrieval.gate_k, retrieval.answer_k).",
		));
	}
	if !retrieval.min_top_score.is_finite() {
		return Err(Error::validation("retrieval.min_top_score must be a finite number."));
	}
	if !(-1.0..=1.0).contains(&retrieval.min_top_score) {
		return Err(Error::validation("retrieval.min_top_score must be in the range -1.0-1.0."));
	}
	if retrieval.min_token_chars == 0 {
		return Err(Error::validation("retrieval.min_token_chars must be greater than zero."));
	}
	if cfg.snippet.fallback_chars == 0 {
		return Err(Error::validation("snippet.fallback_chars must be greater than zero."));
	}

	for (label, list) in [("topic.keywords", &cfg.topic.keywords), ("topic.greetings", &cfg.topic.greetings)]
	{
		if list.is_empty() {
			return Err(Error::validation(format!("{label} must be non-empty.")));
		}
		if list.iter().any(|item| item.trim().is_empty()) {
			return Err(Error::validation(format!("{label} must not contain blank entries.")));
		}
	}

	for (label, value) in [
		("assistant.persona_name", &cfg.assistant.persona_name),
		("assistant.out_of_scope_reply", &cfg.assistant.out_of_scope_reply),
		("assistant.not_found_reply", &cfg.assistant.not_found_reply),
	] {
		if value.trim().is_empty() {
			return Err(Error::validation(format!("{label} must be non-empty.")));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let embedding = &mut cfg.providers.embedding;

	if embedding.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		embedding.api_key = None;
	}

	if let Some(chat) = cfg.providers.chat.as_mut()
		&& chat.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false)
	{
		chat.api_key = None;
	}

	for list in [&mut cfg.topic.keywords, &mut cfg.topic.greetings] {
		for item in list.iter_mut() {
			*item = item.trim().to_lowercase();
		}
	}
}
