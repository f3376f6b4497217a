use libro_corpus::Chunk;

/// Stand-in norm for zero vectors so their similarity comes out as zero instead of NaN.
const ZERO_NORM: f32 = 1e-9;

#[derive(Clone, Copy, Debug)]
pub struct ScoredChunk<'a> {
	pub chunk: &'a Chunk,
	pub score: f32,
}

/// Cosine similarity over the shared prefix of both vectors.
pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> f32 {
	let dot: f32 = lhs.iter().zip(rhs.iter()).map(|(l, r)| l * r).sum();

	dot / (norm(lhs) * norm(rhs))
}

/// Scores every chunk against `query` and keeps the best `top_k`, highest first.
///
/// The sort is stable, so chunks with identical scores keep their store order.
pub fn rank<'a>(query: &[f32], chunks: &'a [Chunk], top_k: usize) -> Vec<ScoredChunk<'a>> {
	let mut scored: Vec<ScoredChunk<'a>> = chunks
		.iter()
		.map(|chunk| ScoredChunk { chunk, score: cosine_similarity(query, &chunk.embedding) })
		.collect();

	scored.sort_by(|a, b| b.score.total_cmp(&a.score));
	scored.truncate(top_k);

	scored
}

fn norm(vec: &[f32]) -> f32 {
	let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();

	if norm == 0.0 { ZERO_NORM } else { norm }
}
