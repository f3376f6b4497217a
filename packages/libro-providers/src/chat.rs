use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use libro_config::ChatProviderConfig;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChatMessage {
	pub role: String,
	pub content: String,
}
impl ChatMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: "system".to_string(), content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: "user".to_string(), content: content.into() }
	}
}

/// Runs one chat completion. `Ok(None)` means the model answered without any content.
pub async fn complete(cfg: &ChatProviderConfig, messages: &[ChatMessage]) -> Result<Option<String>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"messages": messages,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
	});

	tracing::debug!(provider_id = %cfg.provider_id, messages = messages.len(), "Requesting chat completion.");

	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_completion(&json))
}

fn parse_completion(json: &Value) -> Option<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::trim)
		.filter(|content| !content.is_empty())
		.map(str::to_string)
}
