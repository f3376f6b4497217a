use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	Error, LibroService, Result, compose,
	gate::{self, GatePolicy},
	outcome::{DeflectionReason, RetrievalOutcome},
	ranking::{self, ScoredChunk},
};
use libro_config::Strategy;
use libro_domain::{
	snippet::SnippetWindow,
	tokens,
	topic::{self, TopicDecision},
};
use libro_providers::{chat::ChatMessage, embedding::EmbedMode};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AskRequest {
	pub message: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AskResponse {
	pub trace_id: Uuid,
	pub outcome: RetrievalOutcome,
}

impl LibroService {
	/// Resolves one chat turn.
	///
	/// Greetings and out-of-scope questions are answered before the embedding service or the
	/// corpus is touched. A rejected retrieval yields `Unanswerable`, never a guessed answer.
	pub async fn ask(&self, req: AskRequest) -> Result<AskResponse> {
		let trace_id = Uuid::new_v4();
		let message = req.message.trim();

		if message.is_empty() {
			return Err(Error::InvalidRequest {
				message: "message must be a non-empty string.".to_string(),
			});
		}

		let outcome = match topic::classify(message, &self.cfg.topic) {
			TopicDecision::Greeting => {
				tracing::info!(%trace_id, reason = "greeting", "Query deflected.");

				RetrievalOutcome::Deflected {
					reason: DeflectionReason::Greeting,
					reply: topic::greeting_reply(message, &self.cfg.assistant),
				}
			},
			TopicDecision::OutOfScope => {
				tracing::info!(%trace_id, reason = "out_of_scope", "Query deflected.");

				RetrievalOutcome::Deflected {
					reason: DeflectionReason::OutOfScope,
					reply: self.cfg.assistant.out_of_scope_reply.clone(),
				}
			},
			TopicDecision::InScope => self.retrieve(trace_id, message).await?,
		};

		Ok(AskResponse { trace_id, outcome })
	}

	async fn retrieve(&self, trace_id: Uuid, message: &str) -> Result<RetrievalOutcome> {
		let retrieval = &self.cfg.retrieval;
		let query = self.embed_query(message).await?;
		let corpus = self.load_corpus().await?;

		if !corpus.is_empty() && query.len() != corpus.dimensions {
			return Err(Error::provider(format!(
				"Query embedding has {} dimensions; corpus has {}.",
				query.len(),
				corpus.dimensions
			)));
		}

		let query_tokens = tokens::query_tokens(message, retrieval.min_token_chars as usize);
		let ranked = ranking::rank(&query, &corpus.chunks, retrieval.candidate_k as usize);

		if let Err(rejection) = gate::evaluate(&ranked, &query_tokens, GatePolicy::from(retrieval)) {
			tracing::info!(
				%trace_id,
				reason = ?rejection,
				candidates = ranked.len(),
				"Retrieval rejected by relevance gate."
			);

			return Ok(RetrievalOutcome::Unanswerable {
				reply: self.cfg.assistant.not_found_reply.clone(),
			});
		}

		let accepted = &ranked[..ranked.len().min(retrieval.answer_k as usize)];
		let citations = compose::citations(
			accepted,
			&query_tokens,
			retrieval.answer_k as usize,
			SnippetWindow::from(&self.cfg.snippet),
		);
		let reply = match retrieval.strategy {
			Strategy::GroundedRetrieval => compose::compose(message, &citations),
			Strategy::FreeGeneration => self.generate(message, accepted).await?,
		};

		tracing::info!(
			%trace_id,
			strategy = ?retrieval.strategy,
			best_score = ranked[0].score,
			citations = citations.len(),
			"Query answered."
		);

		Ok(RetrievalOutcome::Answered { citations, reply })
	}

	async fn embed_query(&self, message: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let texts = [message.to_string()];
		let vectors = self.providers.embedding.embed(cfg, &texts, EmbedMode::Query).await?;

		vectors
			.into_iter()
			.next()
			.filter(|vec| !vec.is_empty())
			.ok_or_else(|| Error::provider("Embedding service returned no query vector."))
	}

	async fn generate(&self, message: &str, accepted: &[ScoredChunk<'_>]) -> Result<String> {
		let Some(cfg) = self.cfg.providers.chat.as_ref() else {
			return Err(Error::provider("providers.chat is required for free_generation."));
		};
		let context = compose::build_context(accepted);
		let messages = [
			ChatMessage::system(self.cfg.assistant.system_prompt.clone()),
			ChatMessage::user(compose::generation_prompt(message, &context)),
		];
		let reply = self.providers.chat.complete(cfg, &messages).await?;

		Ok(reply.unwrap_or_else(|| self.cfg.assistant.empty_model_reply.clone()))
	}
}
