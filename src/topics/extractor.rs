// The staged topic extraction pipeline.
//
// gate -> segment -> vectorize -> factorize -> rank -> interpret -> parse
//
// Each statistical stage returns an explicit ExtractionError variant instead
// of throwing; `extract_topics` is the absorbing boundary that converts any
// stage failure into a degenerate-but-valid result. Callers never see an
// error from it, only an empty or fallback list.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::interpret;
use super::nmf::{self, NmfParams};
use super::theme::{Keyword, Theme, Topic};
use super::vectorize::{segment, TfidfVectorizer};
use crate::llm::traits::ChatCompleter;
use crate::preprocess::Preprocessor;

/// Minimum normalized token count before vectorization is attempted.
/// Sparse input produces numerically unstable decompositions.
const MIN_TOKENS: usize = 10;

/// Hard ceiling on topic count regardless of what the caller asks for
const TOPIC_CEILING: usize = 5;

/// Why a pipeline stage declined to produce topics.
#[derive(Debug)]
pub enum ExtractionError {
    /// Too little usable text: short corpus, too few pseudo-documents, or a
    /// tiny vocabulary
    InsufficientContent(String),
    /// The TF-IDF matrix was degenerate
    VectorizationFailure(String),
    /// The LLM interpretation call failed after retries
    InterpretationFailure(String),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientContent(detail) => write!(f, "insufficient content: {detail}"),
            Self::VectorizationFailure(detail) => write!(f, "vectorization failure: {detail}"),
            Self::InterpretationFailure(detail) => write!(f, "interpretation failure: {detail}"),
        }
    }
}

impl std::error::Error for ExtractionError {}

/// The topic extraction pipeline. Stateless across calls; one instance can
/// serve concurrent extractions.
pub struct TopicExtractor {
    /// Caller's ceiling on topic count (further capped by vocabulary size)
    pub max_topics: usize,
    /// Keywords to keep per topic
    pub max_keywords: usize,
    preprocessor: Preprocessor,
    vectorizer: TfidfVectorizer,
    llm: Arc<dyn ChatCompleter>,
    model: String,
}

impl TopicExtractor {
    pub fn new(llm: Arc<dyn ChatCompleter>, model: &str) -> Self {
        Self {
            max_topics: 5,
            max_keywords: 10,
            preprocessor: Preprocessor::default(),
            vectorizer: TfidfVectorizer::default(),
            llm,
            model: model.to_string(),
        }
    }

    /// The full pipeline: statistical topics, then LLM labeling.
    ///
    /// Never fails. Insufficient content, degenerate matrices, and LLM
    /// transport errors are logged and come back as an empty list; an
    /// unparseable LLM response comes back as one synthetic theme.
    pub async fn extract_topics(&self, text: &str) -> Vec<Theme> {
        let topics = match self.model_topics(text) {
            Ok(topics) => topics,
            Err(err) => {
                warn!(%err, "Topic modeling produced no topics");
                return Vec::new();
            }
        };

        if topics.is_empty() {
            return Vec::new();
        }

        match interpret::interpret(self.llm.as_ref(), &self.model, text, &topics).await {
            Ok(themes) => themes,
            Err(err) => {
                warn!(%err, "Theme interpretation failed");
                Vec::new()
            }
        }
    }

    /// Stages 1-5: the statistical half of the pipeline. No LLM involved.
    pub fn model_topics(&self, text: &str) -> Result<Vec<Topic>, ExtractionError> {
        // Stage 1: minimum-content gate on the normalized token stream
        let normalized = self.preprocessor.normalize(text);
        let token_count = normalized.split_whitespace().count();
        if token_count < MIN_TOKENS {
            return Err(ExtractionError::InsufficientContent(format!(
                "{token_count} tokens after preprocessing, need at least {MIN_TOKENS}"
            )));
        }

        // Stage 2: pseudo-documents from the original (not preprocessed) text
        let docs = segment(text);
        if docs.len() < 2 {
            return Err(ExtractionError::InsufficientContent(format!(
                "only {} pseudo-document(s) after segmentation",
                docs.len()
            )));
        }

        // Stage 3: TF-IDF
        let matrix = self.vectorizer.fit_transform(&docs);
        let vocab_size = matrix.vocabulary.len();
        if vocab_size < 2 {
            return Err(ExtractionError::InsufficientContent(
                "not enough unique terms for topic modeling".to_string(),
            ));
        }
        if matrix.tfidf.sum() <= 0.0 {
            return Err(ExtractionError::VectorizationFailure(
                "TF-IDF matrix is all zeros".to_string(),
            ));
        }

        // Stage 4: NMF with the topic count capped by the vocabulary
        let n_topics = self.max_topics.min(TOPIC_CEILING).min(vocab_size - 1);
        let params = NmfParams {
            n_components: n_topics,
            ..NmfParams::default()
        };
        let (_doc_topics, topic_terms) = nmf::factorize(&matrix.tfidf, &params);

        // Stage 5: rank keywords, renormalize over the truncated top-k set
        let mut topics = Vec::new();
        for (index, row) in topic_terms.rows().into_iter().enumerate() {
            let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
            ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            ranked.truncate(self.max_keywords);

            let mass: f64 = ranked.iter().map(|(_, weight)| weight).sum();
            if mass <= 0.0 {
                // Regularization can zero out a component entirely
                continue;
            }

            let keywords = ranked
                .into_iter()
                .map(|(j, weight)| Keyword {
                    term: matrix.vocabulary[j].clone(),
                    weight: weight / mass,
                })
                .collect();

            topics.push(Topic {
                index,
                keywords,
                score: mass,
            });
        }

        info!(
            topics = topics.len(),
            vocabulary = vocab_size,
            documents = docs.len(),
            "Modeled topics"
        );

        Ok(topics)
    }
}
