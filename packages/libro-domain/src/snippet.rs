use crate::tokens;

pub const ELLIPSIS: &str = "…";

/// Character budget for a snippet, counted in Unicode scalar values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SnippetWindow {
	pub chars_before: usize,
	pub chars_after: usize,
	pub fallback_chars: usize,
}
impl From<&libro_config::Snippet> for SnippetWindow {
	fn from(cfg: &libro_config::Snippet) -> Self {
		Self {
			chars_before: cfg.chars_before as usize,
			chars_after: cfg.chars_after as usize,
			fallback_chars: cfg.fallback_chars as usize,
		}
	}
}
impl Default for SnippetWindow {
	fn default() -> Self {
		Self::from(&libro_config::Snippet::default())
	}
}

/// Cuts a window of `text` around the first literal hit of a query token.
///
/// Tokens are tried in query order and the first one found anywhere in the text wins, not the
/// earliest position. Without a hit the leading `fallback_chars` characters are returned.
pub fn smart_snippet(text: &str, tokens: &[String], window: SnippetWindow) -> String {
	let collapsed = collapse_whitespace(text);

	if collapsed.is_empty() {
		return String::new();
	}

	let chars: Vec<char> = collapsed.chars().collect();
	let Some(pos) = first_token_position(&chars, tokens) else {
		return leading(&chars, window.fallback_chars);
	};
	let start = pos.saturating_sub(window.chars_before);
	let end = pos.saturating_add(window.chars_after).min(chars.len());
	let mut out = String::with_capacity(end - start + 8);

	if start > 0 {
		out.push_str(ELLIPSIS);
		out.push(' ');
	}

	out.extend(&chars[start..end]);

	if end < chars.len() {
		out.push(' ');
		out.push_str(ELLIPSIS);
	}

	out
}

pub fn collapse_whitespace(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn leading(chars: &[char], limit: usize) -> String {
	let mut out: String = chars.iter().take(limit).collect();

	if chars.len() > limit {
		out.push_str(ELLIPSIS);
	}

	out
}

fn first_token_position(chars: &[char], tokens: &[String]) -> Option<usize> {
	// `origin[i]` is the index in `chars` that produced folded char `i`.
	let mut folded = Vec::with_capacity(chars.len());
	let mut origin = Vec::with_capacity(chars.len());

	for (index, ch) in chars.iter().enumerate() {
		for lower in ch.to_lowercase() {
			folded.push(lower);
			origin.push(index);
		}
	}

	for token in tokens {
		let needle: Vec<char> = tokens::fold_lowercase(token).chars().collect();

		if needle.is_empty() || needle.len() > folded.len() {
			continue;
		}
		if let Some(pos) = folded.windows(needle.len()).position(|window| window == needle.as_slice())
		{
			return Some(origin[pos]);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(items: &[&str]) -> Vec<String> {
		items.iter().map(|item| item.to_string()).collect()
	}

	#[test]
	fn short_text_with_match_is_returned_whole() {
		let snippet = smart_snippet(
			"HTML is a markup language",
			&tokens(&["html"]),
			SnippetWindow::default(),
		);

		assert_eq!(snippet, "HTML is a markup language");
	}

	#[test]
	fn window_is_centered_on_match_with_ellipses() {
		let text = format!("{} selector {}", "a".repeat(400), "b".repeat(400));
		let window = SnippetWindow::default();
		let snippet = smart_snippet(&text, &tokens(&["selector"]), window);
		let body: String =
			snippet.trim_start_matches("… ").trim_end_matches(" …").to_string();

		assert!(snippet.starts_with("… "));
		assert!(snippet.ends_with(" …"));
		assert_eq!(body.chars().count(), window.chars_before + window.chars_after);
		assert_eq!(body.chars().nth(window.chars_before), Some('s'));
	}

	#[test]
	fn falls_back_to_leading_text_without_match() {
		let text = "x".repeat(700);
		let snippet = smart_snippet(&text, &tokens(&["tabla"]), SnippetWindow::default());

		assert_eq!(snippet.chars().count(), 601);
		assert!(snippet.ends_with(ELLIPSIS));
	}

	#[test]
	fn whitespace_runs_are_collapsed() {
		let snippet = smart_snippet("uno\n\n  dos\tTRES", &[], SnippetWindow::default());

		assert_eq!(snippet, "uno dos TRES");
	}

	#[test]
	fn later_tokens_are_tried_when_earlier_ones_miss() {
		let snippet =
			smart_snippet("El elemento canvas dibuja", &tokens(&["tabla", "canvas"]), SnippetWindow {
				chars_before: 3,
				chars_after: 6,
				fallback_chars: 600,
			});

		assert_eq!(snippet, "… to canvas …");
	}

	#[test]
	fn every_gate_match_is_located() {
		for (text, query) in [
			(format!("{} ΣΕΛΙΔΑΣ του βιβλίου", "a".repeat(700)), "ΣΕΛΙΔΑΣ"),
			(format!("{} servidor en İstanbul", "a".repeat(700)), "İstanbul"),
		] {
			let query = crate::tokens::query_tokens(query, 4);
			let snippet = smart_snippet(&text, &query, SnippetWindow::default());

			assert!(crate::tokens::contains_any_token(&text, &query));
			assert!(snippet.starts_with("… "), "fell back to leading text: {query:?}");
		}
	}
}
