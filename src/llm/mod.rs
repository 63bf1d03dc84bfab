// LLM access — capability trait plus the OpenAI-compatible adapter.
//
// The pipeline depends only on the ChatCompleter trait, never on a concrete
// vendor client, so tests substitute canned responses and the provider can
// change without touching extraction logic.

pub mod openai;
pub mod retry;
pub mod traits;
