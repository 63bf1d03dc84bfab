// LLM interpretation of raw NMF topics into labeled themes.
//
// The model is asked for a JSON array of {label, description} objects.
// Models don't always comply, so parsing is two-phase: a strict parse first,
// then a bracket-delimited salvage parse of the first top-level array, and
// finally a synthetic fallback theme carrying the raw response. Callers
// always get a list back.

use regex_lite::Regex;
use tracing::{debug, warn};

use super::extractor::ExtractionError;
use super::theme::{Theme, Topic};
use crate::llm::retry::{with_backoff, BackoffPolicy};
use crate::llm::traits::{ChatCompleter, ChatMessage, ChatRequest};

const SYSTEM_PROMPT: &str = "You are a topic analysis expert who can identify meaningful \
    themes and topics from text and return them in valid JSON format.";

/// How much of the original corpus rides along in the prompt
const EXCERPT_CHARS: usize = 1000;

const TEMPERATURE: f32 = 0.3;

/// Outcome of parsing the LLM's response text.
#[derive(Debug, PartialEq)]
pub enum ParsedThemes {
    Parsed(Vec<Theme>),
    Unparseable(String),
}

/// Ask the LLM to label the raw topics.
///
/// Transport failures are retried with backoff; exhaustion surfaces as
/// `InterpretationFailure`. An unparseable (but delivered) response is not
/// a failure: it degrades to a single synthetic theme.
pub async fn interpret(
    llm: &dyn ChatCompleter,
    model: &str,
    text: &str,
    topics: &[Topic],
) -> Result<Vec<Theme>, ExtractionError> {
    let request = ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(text, topics)),
        ],
        temperature: TEMPERATURE,
        stream: false,
    };

    let response = with_backoff(&BackoffPolicy::default(), || llm.complete(&request))
        .await
        .map_err(|err| ExtractionError::InterpretationFailure(format!("{err:#}")))?;

    match parse_themes(&response) {
        ParsedThemes::Parsed(themes) => {
            debug!(themes = themes.len(), "Parsed interpreted themes");
            Ok(themes)
        }
        ParsedThemes::Unparseable(raw) => {
            warn!("LLM response was not valid JSON, returning it as a single theme");
            Ok(vec![Theme {
                label: "Topic analysis".to_string(),
                description: raw,
            }])
        }
    }
}

/// First `max_chars` characters, never splitting a codepoint.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn build_prompt(text: &str, topics: &[Topic]) -> String {
    let mut topic_analysis = String::new();
    for topic in topics {
        topic_analysis.push_str(&format!(
            "Topic {} (score: {:.2}):\n",
            topic.index + 1,
            topic.score
        ));
        for keyword in &topic.keywords {
            topic_analysis.push_str(&format!(
                "- {} (weight: {:.2})\n",
                keyword.term, keyword.weight
            ));
        }
    }

    format!(
        "Analyze the following text and the extracted topic keywords to identify \
         the main themes and topics.\n\n\
         Text excerpt: {}... (truncated for brevity)\n\n\
         Raw extracted topics:\n{}\n\
         Return a JSON array of topic objects with the following structure:\n\
         [\n    {{\n        \"label\": \"Clear topic name\",\n        \
         \"description\": \"Brief 1-2 sentence description of the topic\"\n    }},\n    ...\n]\n\n\
         Ensure your response can be parsed as valid JSON. \
         Return ONLY the JSON array and nothing else.",
        excerpt(text, EXCERPT_CHARS),
        topic_analysis
    )
}

/// Two-phase parse of the LLM response. Pure; no logging, no fallback
/// construction. The caller decides what Unparseable means.
pub fn parse_themes(raw: &str) -> ParsedThemes {
    if let Ok(themes) = serde_json::from_str::<Vec<Theme>>(raw) {
        return ParsedThemes::Parsed(themes);
    }

    // Salvage: models often wrap the array in prose or code fences
    if let Some(candidate) = find_json_array(raw) {
        if let Ok(themes) = serde_json::from_str::<Vec<Theme>>(candidate) {
            return ParsedThemes::Parsed(themes);
        }
    }

    ParsedThemes::Unparseable(raw.to_string())
}

/// Locate the first top-level JSON array substring (first '[' through the
/// last ']').
fn find_json_array(raw: &str) -> Option<&str> {
    let pattern = Regex::new(r"(?s)\[.*\]").ok()?;
    pattern.find(raw).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_json_parses() {
        let raw = r#"[{"label": "Billing", "description": "Invoice questions."}]"#;
        match parse_themes(raw) {
            ParsedThemes::Parsed(themes) => {
                assert_eq!(themes.len(), 1);
                assert_eq!(themes[0].label, "Billing");
            }
            other => panic!("expected parse, got {other:?}"),
        }
    }

    #[test]
    fn array_is_salvaged_from_surrounding_prose() {
        let raw = "Here are the themes you asked for:\n```json\n\
                   [{\"label\": \"Billing\", \"description\": \"Invoice questions.\"}]\n\
                   ```\nLet me know if you need more.";
        match parse_themes(raw) {
            ParsedThemes::Parsed(themes) => assert_eq!(themes[0].label, "Billing"),
            other => panic!("expected salvage parse, got {other:?}"),
        }
    }

    #[test]
    fn non_json_text_is_unparseable_verbatim() {
        let raw = "The main theme is billing, followed by refunds.";
        assert_eq!(
            parse_themes(raw),
            ParsedThemes::Unparseable(raw.to_string())
        );
    }

    #[test]
    fn wrong_shape_json_is_unparseable() {
        // Valid JSON, but not an array of {label, description}
        let raw = r#"{"themes": ["billing"]}"#;
        assert!(matches!(parse_themes(raw), ParsedThemes::Unparseable(_)));
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        let text = "é".repeat(2000);
        let cut = excerpt(&text, 1000);
        assert_eq!(cut.chars().count(), 1000);
    }

    #[test]
    fn prompt_carries_topic_summary_and_excerpt() {
        use crate::topics::theme::Keyword;

        let topics = vec![Topic {
            index: 0,
            keywords: vec![Keyword {
                term: "contract".to_string(),
                weight: 1.0,
            }],
            score: 0.42,
        }];
        let prompt = build_prompt("Chats about contract review.", &topics);
        assert!(prompt.contains("contract (weight: 1.00)"));
        assert!(prompt.contains("Topic 1 (score: 0.42)"));
        assert!(prompt.contains("Chats about contract review."));
    }
}
