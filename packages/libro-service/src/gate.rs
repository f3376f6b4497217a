use serde::Serialize;

use crate::ranking::ScoredChunk;
use libro_domain::tokens;

#[derive(Clone, Copy, Debug)]
pub struct GatePolicy {
	pub min_top_score: f32,
	/// Leading candidates searched for a literal query token.
	pub lexical_window: usize,
}
impl From<&libro_config::Retrieval> for GatePolicy {
	fn from(cfg: &libro_config::Retrieval) -> Self {
		Self { min_top_score: cfg.min_top_score, lexical_window: cfg.gate_k as usize }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GateRejection {
	Empty,
	LowScore { best: f32 },
	NoLexicalMatch,
}

/// Decides whether the ranked candidates are trustworthy enough to answer from.
///
/// Both checks must pass: the best score clears the threshold, and some leading candidate
/// literally contains a query token. An empty token list cannot falsify the lexical check.
pub fn evaluate(
	ranked: &[ScoredChunk<'_>],
	query_tokens: &[String],
	policy: GatePolicy,
) -> Result<(), GateRejection> {
	let Some(best) = ranked.first() else {
		return Err(GateRejection::Empty);
	};

	if !(best.score >= policy.min_top_score) {
		return Err(GateRejection::LowScore { best: best.score });
	}
	if !has_lexical_match(ranked, query_tokens, policy.lexical_window) {
		return Err(GateRejection::NoLexicalMatch);
	}

	Ok(())
}

pub fn accept(ranked: &[ScoredChunk<'_>], query_tokens: &[String], policy: GatePolicy) -> bool {
	evaluate(ranked, query_tokens, policy).is_ok()
}

fn has_lexical_match(ranked: &[ScoredChunk<'_>], query_tokens: &[String], window: usize) -> bool {
	if query_tokens.is_empty() {
		return true;
	}

	ranked
		.iter()
		.take(window)
		.any(|scored| tokens::contains_any_token(&scored.chunk.text, query_tokens))
}
