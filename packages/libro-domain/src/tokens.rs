use unicode_normalization::UnicodeNormalization;

/// Lowercase word tokens of at least `min_chars` characters, in query order, without repeats.
///
/// Anything that is not a Unicode letter, digit or whitespace splits words, so `"¿Qué es HTML?"`
/// yields `["html"]` for a minimum of four.
pub fn query_tokens(query: &str, min_chars: usize) -> Vec<String> {
	let normalized: String = query.nfkc().collect();
	let mut cleaned = String::with_capacity(normalized.len());

	for ch in fold_lowercase(&normalized).chars() {
		if ch.is_alphanumeric() || ch.is_whitespace() {
			cleaned.push(ch);
		} else {
			cleaned.push(' ');
		}
	}

	let mut out: Vec<String> = Vec::new();

	for token in cleaned.split_whitespace() {
		if token.chars().count() < min_chars {
			continue;
		}
		if out.iter().any(|seen| seen == token) {
			continue;
		}

		out.push(token.to_string());
	}

	out
}

/// True when `text` contains any token as a case-insensitive literal substring.
pub fn contains_any_token(text: &str, tokens: &[String]) -> bool {
	if tokens.is_empty() {
		return false;
	}

	let lower = fold_lowercase(text);

	tokens.iter().any(|token| lower.contains(fold_lowercase(token).as_str()))
}

/// Full per-char lowercase mapping. Snippet search uses the same folding, so every token the
/// lexical gate finds can also be located inside the text.
pub fn fold_lowercase(text: &str) -> String {
	text.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_punctuation_and_short_words() {
		assert_eq!(query_tokens("¿Qué es HTML?", 4), vec!["html".to_string()]);
		assert_eq!(
			query_tokens("¿Cómo funciona el modelo de cajas en CSS?", 4),
			vec!["cómo".to_string(), "funciona".to_string(), "modelo".to_string(), "cajas".to_string()]
		);
	}

	#[test]
	fn repeated_words_are_kept_once() {
		assert_eq!(query_tokens("tabla tabla TABLA", 4), vec!["tabla".to_string()]);
	}

	#[test]
	fn fullwidth_input_is_normalized() {
		assert_eq!(query_tokens("ＨＴＭＬ５", 4), vec!["html5".to_string()]);
	}

	#[test]
	fn folding_is_per_char() {
		assert_eq!(fold_lowercase("İSTANBUL"), "i\u{307}stanbul");
		// No word-final sigma rule, so query and text fold the same way.
		assert_eq!(query_tokens("ΣΕΛΙΔΑΣ", 4), vec!["σελιδασ".to_string()]);
		assert!(contains_any_token("Η ΣΕΛΙΔΑΣ του βιβλίου", &query_tokens("ΣΕΛΙΔΑΣ", 4)));
	}

	#[test]
	fn no_tokens_never_match() {
		assert!(!contains_any_token("anything", &[]));
		assert!(contains_any_token("El DOM del navegador", &["dom".to_string()]));
	}
}
