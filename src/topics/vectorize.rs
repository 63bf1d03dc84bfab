// Pseudo-document segmentation and TF-IDF vectorization.
//
// NMF needs multiple documents to expose term co-occurrence structure. A
// single long string gives a degenerate rank-1 matrix, so the corpus is
// split on sentence boundaries, with a fixed-width chunk fallback for text
// that has too few sentences (chat titles rarely end in punctuation).

use std::collections::{HashMap, HashSet};

use ndarray::Array2;
use stop_words::{get, LANGUAGE};

/// Fallback window size (in chars) when sentence splitting yields too few
/// pseudo-documents.
const CHUNK_CHARS: usize = 100;

/// TF-IDF matrix over the pseudo-document set. Rows are pseudo-documents,
/// columns correspond to `vocabulary` entries.
pub struct TermMatrix {
    pub tfidf: Array2<f64>,
    pub vocabulary: Vec<String>,
}

/// Split the corpus into pseudo-documents.
///
/// Sentence boundaries first; if fewer than 3 sentences result, fall back to
/// fixed 100-character windows over the raw text. Whitespace-only pieces are
/// dropped either way.
pub fn segment(text: &str) -> Vec<String> {
    let sentences: Vec<String> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if sentences.len() >= 3 {
        return sentences;
    }
    chunk_chars(text, CHUNK_CHARS)
}

fn chunk_chars(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|window| window.iter().collect::<String>())
        .filter(|piece| !piece.trim().is_empty())
        .collect()
}

/// TF-IDF vectorizer with document-frequency pruning and n-gram features.
///
/// Near-universal terms (df above `max_df` of the corpus) and singleton
/// terms (df below `min_df`) are noise for topic modeling and get dropped.
/// Both unigrams and bigrams are emitted so multiword phrases like
/// "contract review" can surface as single topic keywords.
pub struct TfidfVectorizer {
    /// Ignore terms present in more than this fraction of pseudo-documents
    pub max_df: f64,
    /// Ignore terms present in fewer than this many pseudo-documents
    pub min_df: usize,
    /// Vocabulary cap; the most frequent terms across the corpus win
    pub max_features: usize,
    stopwords: HashSet<String>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            max_df: 0.85,
            min_df: 2,
            max_features: 1000,
            stopwords: get(LANGUAGE::English).into_iter().collect(),
        }
    }
}

impl TfidfVectorizer {
    /// Lowercased alphanumeric tokens of length >= 2, stopwords removed.
    fn tokenize(&self, doc: &str) -> Vec<String> {
        let stripped: String = doc
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    ' '
                }
            })
            .collect();
        stripped
            .split_whitespace()
            .filter(|token| token.len() >= 2 && !self.stopwords.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Build the TF-IDF matrix over the pseudo-documents.
    ///
    /// Smoothed IDF (ln((1+n)/(1+df)) + 1) with L2-normalized rows. The
    /// vocabulary may come back with fewer than 2 entries; the caller decides
    /// whether that is enough to factorize.
    pub fn fit_transform(&self, docs: &[String]) -> TermMatrix {
        let n_docs = docs.len();

        // Unigram + bigram term stream per document
        let term_docs: Vec<Vec<String>> = docs
            .iter()
            .map(|doc| {
                let tokens = self.tokenize(doc);
                let mut terms = tokens.clone();
                terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
                terms
            })
            .collect();

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for terms in &term_docs {
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Corpus-wide counts decide which terms survive the feature cap
        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &term_docs {
            for term in terms {
                *corpus_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let df_ceiling = self.max_df * n_docs as f64;
        let mut kept: Vec<(&str, usize)> = doc_freq
            .iter()
            .filter(|(_, &df)| df >= self.min_df && (df as f64) <= df_ceiling)
            .map(|(term, _)| {
                let freq = corpus_freq.get(term.as_str()).copied().unwrap_or(0);
                (term.as_str(), freq)
            })
            .collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        kept.truncate(self.max_features);

        let mut vocabulary: Vec<String> = kept.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let mut tfidf = Array2::<f64>::zeros((n_docs, vocabulary.len()));
        for (d, terms) in term_docs.iter().enumerate() {
            for term in terms {
                if let Some(&j) = index.get(term.as_str()) {
                    tfidf[[d, j]] += 1.0;
                }
            }
        }

        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        for mut row in tfidf.rows_mut() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell *= idf[j];
            }
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|x| x / norm);
            }
        }

        TermMatrix { tfidf, vocabulary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn segment_splits_on_sentence_boundaries() {
        let pieces = segment("First sentence. Second one! Third here? Trailing");
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces[0], "First sentence");
    }

    #[test]
    fn segment_falls_back_to_chunks_without_punctuation() {
        let long = "word ".repeat(60); // 300 chars, no sentence boundaries
        let pieces = segment(&long);
        assert!(pieces.len() >= 3);
        assert!(pieces.iter().all(|p| !p.trim().is_empty()));
    }

    #[test]
    fn segment_chunking_is_char_boundary_safe() {
        // Multibyte chars must not split mid-codepoint
        let text = "é".repeat(250);
        let pieces = segment(&text);
        assert!(!pieces.is_empty());
        assert_eq!(pieces[0].chars().count(), 100);
    }

    #[test]
    fn singleton_terms_are_pruned() {
        let vectorizer = TfidfVectorizer::default();
        let matrix = vectorizer.fit_transform(&docs(&[
            "billing invoice ticket",
            "billing invoice dispute",
            "unrelated onceonly zebra",
        ]));
        assert!(matrix.vocabulary.iter().any(|t| t == "billing"));
        assert!(!matrix.vocabulary.iter().any(|t| t == "zebra"));
    }

    #[test]
    fn near_universal_terms_are_pruned() {
        let vectorizer = TfidfVectorizer::default();
        // "shared" appears in all 4 docs (df 4 > 0.85 * 4)
        let matrix = vectorizer.fit_transform(&docs(&[
            "shared billing ticket",
            "shared billing payment",
            "shared invoice ticket",
            "shared invoice payment",
        ]));
        assert!(!matrix.vocabulary.iter().any(|t| t == "shared"));
        assert!(matrix.vocabulary.iter().any(|t| t == "billing"));
    }

    #[test]
    fn bigrams_are_included() {
        let vectorizer = TfidfVectorizer::default();
        let matrix = vectorizer.fit_transform(&docs(&[
            "contract review meeting",
            "contract review notes",
            "budget planning xyz",
        ]));
        assert!(matrix.vocabulary.iter().any(|t| t == "contract review"));
    }

    #[test]
    fn rows_are_l2_normalized() {
        let vectorizer = TfidfVectorizer::default();
        let matrix = vectorizer.fit_transform(&docs(&[
            "billing invoice ticket",
            "billing invoice payment",
            "refund policy ticket",
            "refund policy payment",
        ]));
        for row in matrix.tfidf.rows() {
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                assert!((norm - 1.0).abs() < 1e-9, "row norm {norm}");
            }
        }
    }
}
