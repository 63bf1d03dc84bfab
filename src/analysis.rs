// Corpus-level LLM helpers: per-chat summaries and free-form Q&A.
//
// These sit outside the extraction pipeline. They propagate errors to the
// caller (the CLI prints them), unlike extract_topics which absorbs its
// failures.

use anyhow::Result;

use crate::llm::retry::{with_backoff, BackoffPolicy};
use crate::llm::traits::{ChatCompleter, ChatMessage, ChatRequest};
use crate::topics::interpret::excerpt;
use crate::topics::theme::Theme;

const CORPUS_EXCERPT_CHARS: usize = 1000;

/// Summarize one chat in under 25 words.
///
/// Wrapped in backoff retry; the summary endpoint is hit once per cached
/// record and is the flakiest call in the surrounding system.
pub async fn summarize(llm: &dyn ChatCompleter, model: &str, text: &str) -> Result<String> {
    let request = ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system("You are a helpful assistant expert in summarizing."),
            ChatMessage::user(format!(
                "Summarize the following chat in less than 25 words \
                 with understanding of intent in the chat: {text}"
            )),
        ],
        temperature: 0.5,
        stream: false,
    };

    with_backoff(&BackoffPolicy::default(), || llm.complete(&request)).await
}

/// Answer a free-form question about the corpus, with the extracted themes
/// as context.
pub async fn answer_question(
    llm: &dyn ChatCompleter,
    model: &str,
    corpus: &str,
    themes: &[Theme],
    question: &str,
) -> Result<String> {
    let theme_lines = themes
        .iter()
        .map(|t| format!("- {}: {}", t.label, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    let request = ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(
                "You are a helpful assistant who answers questions based on data \
                 from the database.",
            ),
            ChatMessage::user(format!(
                "Answer the user question based on the following data from the database:\n\n\
                 Text Content: {}... (truncated)\n\n\
                 Highlighted Topics:\n{}\n\n\
                 Question: {}",
                excerpt(corpus, CORPUS_EXCERPT_CHARS),
                theme_lines,
                question
            )),
        ],
        temperature: 0.5,
        stream: false,
    };

    llm.complete(&request).await
}
