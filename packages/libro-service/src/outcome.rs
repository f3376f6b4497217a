use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeflectionReason {
	Greeting,
	OutOfScope,
}

/// Owned view of one chunk that backed an answer.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Citation {
	pub id: String,
	pub source: String,
	pub page: Option<i64>,
	pub sequence_index: Option<u64>,
	pub score: f32,
	pub snippet: String,
}

/// What a single chat turn resolved to. Only `Answered` carries corpus content.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetrievalOutcome {
	Deflected { reason: DeflectionReason, reply: String },
	Unanswerable { reply: String },
	Answered { citations: Vec<Citation>, reply: String },
}
impl RetrievalOutcome {
	pub fn reply(&self) -> &str {
		match self {
			Self::Deflected { reply, .. }
			| Self::Unanswerable { reply }
			| Self::Answered { reply, .. } => reply.as_str(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_with_kind_tag() {
		let outcome = RetrievalOutcome::Deflected {
			reason: DeflectionReason::OutOfScope,
			reply: "Solo atiendo preguntas de Sistemas.".to_string(),
		};
		let json = serde_json::to_value(&outcome).expect("Failed to serialize outcome.");

		assert_eq!(json["kind"], "deflected");
		assert_eq!(json["reason"], "out_of_scope");
		assert_eq!(outcome.reply(), "Solo atiendo preguntas de Sistemas.");
	}

	#[test]
	fn answered_round_trips_citations() {
		let outcome = RetrievalOutcome::Answered {
			citations: vec![Citation {
				id: "c1".to_string(),
				source: "css.pdf".to_string(),
				page: None,
				sequence_index: Some(4),
				score: 0.5,
				snippet: "CSS".to_string(),
			}],
			reply: "ok".to_string(),
		};
		let json = serde_json::to_string(&outcome).expect("Failed to serialize outcome.");
		let decoded: RetrievalOutcome =
			serde_json::from_str(&json).expect("Failed to deserialize outcome.");

		assert_eq!(decoded, outcome);
	}
}
