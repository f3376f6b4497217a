use crate::{outcome::Citation, ranking::ScoredChunk};
use libro_domain::snippet::{self, SnippetWindow};

const GROUNDED_HEADER: &str = "Respuesta basada únicamente en los libros cargados.";
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";
const UNKNOWN_PAGE: &str = "?";

/// Turns the leading accepted chunks into citations with smart snippets.
pub fn citations(
	accepted: &[ScoredChunk<'_>],
	tokens: &[String],
	answer_k: usize,
	window: SnippetWindow,
) -> Vec<Citation> {
	accepted
		.iter()
		.take(answer_k)
		.map(|scored| Citation {
			id: scored.chunk.id.clone(),
			source: scored.chunk.source.clone(),
			page: scored.chunk.page,
			sequence_index: scored.chunk.sequence_index,
			score: scored.score,
			snippet: snippet::smart_snippet(&scored.chunk.text, tokens, window),
		})
		.collect()
}

/// Renders the grounded reply: header, the question, then one numbered block per citation.
pub fn compose(query: &str, citations: &[Citation]) -> String {
	let mut out = format!(
		"{GROUNDED_HEADER}\n\n**Pregunta:** {query}\n\n**Fragmentos encontrados (top {}):**\n\n",
		citations.len()
	);

	for (i, citation) in citations.iter().enumerate() {
		out.push_str(&format!(
			"---\n**Fuente {}:** {} (pág. {}) — score {:.3}\n\n{}\n\n",
			i + 1,
			citation.source,
			page_label(citation.page),
			citation.score,
			citation.snippet,
		));
	}

	out.trim().to_string()
}

/// Numbered context block handed to the chat model, one `[#n]` marker per chunk.
pub fn build_context(accepted: &[ScoredChunk<'_>]) -> String {
	accepted
		.iter()
		.enumerate()
		.map(|(i, scored)| {
			format!(
				"[#{}] ({}, pág. {}, score:{:.3})\n{}",
				i + 1,
				scored.chunk.source,
				page_label(scored.chunk.page),
				scored.score,
				scored.chunk.text,
			)
		})
		.collect::<Vec<_>>()
		.join(CONTEXT_SEPARATOR)
}

pub fn generation_prompt(query: &str, context: &str) -> String {
	format!("Pregunta: {query}\n\nFragmentos:\n\n{context}")
}

fn page_label(page: Option<i64>) -> String {
	page.map(|page| page.to_string()).unwrap_or_else(|| UNKNOWN_PAGE.to_string())
}
