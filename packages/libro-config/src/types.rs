use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub corpus: Corpus,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub snippet: Snippet,
	#[serde(default)]
	pub topic: Topic,
	#[serde(default)]
	pub assistant: Assistant,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Corpus {
	/// JSON array or newline-delimited JSON file of embedded chunks.
	pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	/// Required when `retrieval.strategy` is `free_generation`.
	pub chat: Option<ChatProviderConfig>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Local servers usually run without a key; a blank key disables the auth header.
	#[serde(default)]
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	#[serde(default = "default_embedding_timeout_ms")]
	pub timeout_ms: u64,
	/// Prepended to query text (nomic-style models expect `search_query: `).
	#[serde(default = "default_query_prefix")]
	pub query_prefix: String,
	#[serde(default = "default_document_prefix")]
	pub document_prefix: String,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChatProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	#[serde(default = "default_chat_temperature")]
	pub temperature: f32,
	#[serde(default = "default_chat_max_tokens")]
	pub max_tokens: u32,
	#[serde(default = "default_chat_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	/// Reply is assembled from cited corpus snippets only.
	#[default]
	GroundedRetrieval,
	/// Reply is generated by the chat model from the accepted corpus context.
	FreeGeneration,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	pub strategy: Strategy,
	/// Candidates pulled from the ranker per query.
	pub candidate_k: u32,
	/// Leading candidates inspected by the lexical cross-check.
	pub gate_k: u32,
	/// Leading candidates cited in the reply.
	pub answer_k: u32,
	/// Best cosine score below this value means "not found in corpus".
	pub min_top_score: f32,
	/// Query words shorter than this are ignored by the lexical checks.
	pub min_token_chars: u32,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self {
			strategy: Strategy::default(),
			candidate_k: 8,
			gate_k: 5,
			answer_k: 3,
			min_top_score: 0.25,
			min_token_chars: 4,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Snippet {
	pub chars_before: u32,
	pub chars_after: u32,
	pub fallback_chars: u32,
}
impl Default for Snippet {
	fn default() -> Self {
		Self { chars_before: 250, chars_after: 350, fallback_chars: 600 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Topic {
	pub keywords: Vec<String>,
	pub greetings: Vec<String>,
}
impl Default for Topic {
	fn default() -> Self {
		Self { keywords: owned(DEFAULT_KEYWORDS), greetings: owned(DEFAULT_GREETINGS) }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Assistant {
	pub persona_name: String,
	pub domain_label: String,
	pub out_of_scope_reply: String,
	pub not_found_reply: String,
	pub empty_model_reply: String,
	pub system_prompt: String,
}
impl Default for Assistant {
	fn default() -> Self {
		Self {
			persona_name: "Asistente IA del ITSVA".to_string(),
			domain_label: "Sistemas".to_string(),
			out_of_scope_reply: "Solo atiendo preguntas del área de Sistemas basadas en los libros cargados. Ejemplos: CSS, JavaScript, XHTML, programación, informática, redes, web.".to_string(),
			not_found_reply: "Ese tema sí es del área de Sistemas, pero no encontré la información en los libros cargados.".to_string(),
			empty_model_reply: "No recibí respuesta del modelo.".to_string(),
			system_prompt: "Eres el Asistente IA del ITSVA. Responde en español usando únicamente los fragmentos proporcionados y cita cada dato con su marcador [#n]. Si los fragmentos no contienen la respuesta, dilo sin inventar información.".to_string(),
		}
	}
}

pub const DEFAULT_KEYWORDS: &[&str] = &[
	"css",
	"html",
	"xhtml",
	"javascript",
	"js",
	"dom",
	"web",
	"frontend",
	"backend",
	"programacion",
	"programación",
	"informatica",
	"informática",
	"computacion",
	"computación",
	"sistemas",
	"software",
	"internet",
	"navegador",
	"http",
	"url",
	"api",
	"base de datos",
	"sql",
	"redes",
	"servidor",
	"framework",
	"algoritmo",
	"poo",
	"clase",
	"objeto",
];

pub const DEFAULT_GREETINGS: &[&str] = &[
	"hola",
	"holi",
	"buenas",
	"buenos días",
	"buenas tardes",
	"buenas noches",
	"como estas",
	"cómo estás",
	"quien eres",
	"quién eres",
	"que eres",
	"qué eres",
	"ayuda",
];

fn owned(items: &[&str]) -> Vec<String> {
	items.iter().map(|item| item.to_string()).collect()
}

fn default_embedding_timeout_ms() -> u64 {
	60_000
}

fn default_chat_timeout_ms() -> u64 {
	120_000
}

fn default_chat_temperature() -> f32 {
	0.2
}

fn default_chat_max_tokens() -> u32 {
	700
}

fn default_query_prefix() -> String {
	"search_query: ".to_string()
}

fn default_document_prefix() -> String {
	"search_document: ".to_string()
}
