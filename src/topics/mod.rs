// Topic extraction — TF-IDF vectorization, NMF decomposition, and LLM
// theme interpretation.

pub mod extractor;
pub mod interpret;
pub mod nmf;
pub mod theme;
pub mod vectorize;
