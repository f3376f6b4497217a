use serde::{Deserialize, Serialize};

use libro_config::{Assistant, Topic};

/// How a raw query is routed before any embedding work happens.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicDecision {
	Greeting,
	OutOfScope,
	InScope,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GreetingKind {
	Identity,
	Wellbeing,
	Hello,
}

const IDENTITY_MARKERS: &[&str] = &["quien", "quién", "que eres", "qué eres"];
const WELLBEING_MARKERS: &[&str] = &["como estas", "cómo estás"];

/// Greetings win over the domain check, so "hola" never reaches the embedding service.
pub fn classify(query: &str, topic: &Topic) -> TopicDecision {
	if is_greeting(query, &topic.greetings) {
		return TopicDecision::Greeting;
	}
	if !is_in_scope(query, &topic.keywords) {
		return TopicDecision::OutOfScope;
	}

	TopicDecision::InScope
}

/// Recall-biased keyword gate: any keyword occurring as a substring of the lowercased query.
pub fn is_in_scope<S>(query: &str, keywords: &[S]) -> bool
where
	S: AsRef<str>,
{
	contains_any_phrase(&query.to_lowercase(), keywords)
}

pub fn is_greeting<S>(query: &str, phrases: &[S]) -> bool
where
	S: AsRef<str>,
{
	contains_any_phrase(query.trim().to_lowercase().as_str(), phrases)
}

pub fn greeting_kind(query: &str) -> GreetingKind {
	let lower = query.to_lowercase();

	if contains_any_phrase(&lower, IDENTITY_MARKERS) {
		GreetingKind::Identity
	} else if contains_any_phrase(&lower, WELLBEING_MARKERS) {
		GreetingKind::Wellbeing
	} else {
		GreetingKind::Hello
	}
}

pub fn greeting_reply(query: &str, assistant: &Assistant) -> String {
	let persona = assistant.persona_name.as_str();
	let domain = assistant.domain_label.as_str();

	match greeting_kind(query) {
		GreetingKind::Identity => format!(
			"Soy el {persona}. Puedo ayudarte con temas del área de {domain} basándome en los libros cargados."
		),
		GreetingKind::Wellbeing => format!(
			"¡Bien! Listo para ayudarte. Pregúntame algo del área de {domain} (CSS, JavaScript, XHTML, etc.)."
		),
		GreetingKind::Hello => format!("¡Hola! Soy el {persona}. ¿Qué tema de {domain} necesitas?"),
	}
}

fn contains_any_phrase<S>(lower: &str, phrases: &[S]) -> bool
where
	S: AsRef<str>,
{
	phrases.iter().any(|phrase| {
		let phrase = phrase.as_ref();

		!phrase.is_empty() && lower.contains(phrase.to_lowercase().as_str())
	})
}
