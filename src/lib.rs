// Promptquest: topic analytics for AI chat logs
//
// This is the library root. Each module corresponds to a major piece of the
// analytics pipeline.

pub mod analysis;
pub mod config;
pub mod llm;
pub mod preprocess;
pub mod topics;
