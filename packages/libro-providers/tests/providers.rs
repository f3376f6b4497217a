use std::{net::SocketAddr, time::Duration};

use axum::{Json, Router, http::StatusCode, routing::post};
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use libro_config::{ChatProviderConfig, EmbeddingProviderConfig};
use libro_providers::{
	Error,
	chat::{self, ChatMessage},
	embedding::{self, EmbedMode},
};

fn embedding_config(addr: SocketAddr, timeout_ms: u64) -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: format!("http://{addr}"),
		api_key: None,
		path: "/v1/embeddings".to_string(),
		model: "nomic-embed-text-v1.5".to_string(),
		dimensions: 3,
		timeout_ms,
		query_prefix: "search_query: ".to_string(),
		document_prefix: "search_document: ".to_string(),
		default_headers: Map::new(),
	}
}

fn chat_config(addr: SocketAddr) -> ChatProviderConfig {
	ChatProviderConfig {
		provider_id: "test".to_string(),
		api_base: format!("http://{addr}/"),
		api_key: Some("secret".to_string()),
		path: "v1/chat/completions".to_string(),
		model: "llama".to_string(),
		temperature: 0.2,
		max_tokens: 700,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

async fn serve(router: Router) -> SocketAddr {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind test listener.");
	let addr = listener.local_addr().expect("Listener must have an address.");

	tokio::spawn(async move {
		axum::serve(listener, router).await.expect("Test server failed.");
	});

	addr
}

/// Answers with a vector that encodes which prefix the input carried.
async fn prefix_echo(Json(body): Json<Value>) -> Json<Value> {
	let input = body["input"][0].as_str().unwrap_or_default();
	let embedding = if input.starts_with("search_query: ") {
		[1.0, 0.0, 0.0]
	} else if input.starts_with("search_document: ") {
		[0.0, 1.0, 0.0]
	} else {
		[0.0, 0.0, 1.0]
	};

	Json(serde_json::json!({ "data": [{ "index": 0, "embedding": embedding }] }))
}

#[test]
fn builds_bearer_auth_header() {
	let headers = libro_providers::auth_headers(Some("secret"), &Map::new())
		.expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn blank_key_sends_no_authorization() {
	let headers =
		libro_providers::auth_headers(Some("  "), &Map::new()).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
}

#[test]
fn non_string_default_header_is_rejected() {
	let mut extra = Map::new();

	extra.insert("x-retries".to_string(), Value::from(3));

	let err = libro_providers::auth_headers(None, &extra).expect_err("Expected config error.");

	assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn query_mode_sends_query_prefix() {
	let addr = serve(Router::new().route("/v1/embeddings", post(prefix_echo))).await;
	let cfg = embedding_config(addr, 1_000);
	let query = embedding::embed(&cfg, &["¿qué es CSS?".to_string()], EmbedMode::Query)
		.await
		.expect("Embedding request failed.");
	let document = embedding::embed(&cfg, &["CSS es".to_string()], EmbedMode::Document)
		.await
		.expect("Embedding request failed.");

	assert_eq!(query, vec![vec![1.0, 0.0, 0.0]]);
	assert_eq!(document, vec![vec![0.0, 1.0, 0.0]]);
}

#[tokio::test]
async fn slow_embedding_service_times_out() {
	let router = Router::new().route(
		"/v1/embeddings",
		post(|| async {
			tokio::time::sleep(Duration::from_millis(500)).await;

			Json(serde_json::json!({ "data": [{ "embedding": [1.0, 0.0, 0.0] }] }))
		}),
	);
	let addr = serve(router).await;
	let cfg = embedding_config(addr, 50);
	let err = embedding::embed(&cfg, &["css".to_string()], EmbedMode::Query)
		.await
		.expect_err("Expected timeout.");

	assert!(err.is_timeout(), "Unexpected error: {err}");
}

#[tokio::test]
async fn server_errors_are_surfaced() {
	let router = Router::new()
		.route("/v1/embeddings", post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "loading model") }));
	let addr = serve(router).await;
	let cfg = embedding_config(addr, 1_000);
	let err = embedding::embed(&cfg, &["css".to_string()], EmbedMode::Query)
		.await
		.expect_err("Expected status error.");

	assert!(matches!(err, Error::Reqwest(_)));
	assert!(!err.is_timeout());
}

#[tokio::test]
async fn wrong_dimensions_are_an_invalid_response() {
	let router = Router::new().route(
		"/v1/embeddings",
		post(|| async { Json(serde_json::json!({ "data": [{ "embedding": [1.0, 0.0] }] })) }),
	);
	let addr = serve(router).await;
	let cfg = embedding_config(addr, 1_000);
	let err = embedding::embed(&cfg, &["css".to_string()], EmbedMode::Query)
		.await
		.expect_err("Expected dimension error.");

	assert!(matches!(err, Error::InvalidResponse { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn overflowing_query_vector_is_an_invalid_response() {
	let router = Router::new().route(
		"/v1/embeddings",
		post(|| async { Json(serde_json::json!({ "data": [{ "embedding": [1e39, 0.0, 0.0] }] })) }),
	);
	let addr = serve(router).await;
	let cfg = embedding_config(addr, 1_000);
	let err = embedding::embed(&cfg, &["css".to_string()], EmbedMode::Query)
		.await
		.expect_err("Expected non-finite value error.");

	assert!(matches!(err, Error::InvalidResponse { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn chat_completion_returns_first_choice() {
	let router = Router::new().route(
		"/v1/chat/completions",
		post(|Json(body): Json<Value>| async move {
			let system = body["messages"][0]["role"].as_str().unwrap_or_default().to_string();

			Json(serde_json::json!({
				"choices": [{ "message": { "role": "assistant", "content": format!("role={system}") } }]
			}))
		}),
	);
	let addr = serve(router).await;
	let cfg = chat_config(addr);
	let reply = chat::complete(&cfg, &[ChatMessage::system("sé breve"), ChatMessage::user("hola")])
		.await
		.expect("Chat request failed.");

	assert_eq!(reply.as_deref(), Some("role=system"));
}
