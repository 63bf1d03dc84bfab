use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use promptquest::analysis;
use promptquest::config::Config;
use promptquest::llm::openai::OpenAiClient;
use promptquest::llm::traits::NoopCompleter;
use promptquest::topics::extractor::TopicExtractor;
use promptquest::topics::theme;

/// Promptquest: topic analytics for AI chat logs.
///
/// Extracts latent themes from chat titles with TF-IDF + NMF and labels
/// them with an LLM.
#[derive(Parser)]
#[command(name = "promptquest", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract topics from a corpus file (use "-" for stdin)
    Topics {
        /// File containing the corpus (e.g. chat titles joined into text)
        file: PathBuf,

        /// Maximum number of topics to extract
        #[arg(long, default_value = "5")]
        max_topics: usize,

        /// Keywords to keep per topic
        #[arg(long, default_value = "10")]
        max_keywords: usize,

        /// Print raw NMF topics without LLM interpretation
        #[arg(long)]
        raw: bool,
    },

    /// Answer a question about the corpus, using extracted themes as context
    Ask {
        file: PathBuf,

        /// The question to answer
        question: String,
    },

    /// Summarize a single chat transcript in under 25 words
    Summarize { file: PathBuf },
}

fn read_corpus(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read corpus from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus from {}", path.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("promptquest=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Topics {
            file,
            max_topics,
            max_keywords,
            raw,
        } => {
            let text = read_corpus(&file)?;

            if raw {
                // Statistical stage only; no LLM needed
                let mut extractor = TopicExtractor::new(Arc::new(NoopCompleter), &config.llm_model);
                extractor.max_topics = max_topics;
                extractor.max_keywords = max_keywords;

                match extractor.model_topics(&text) {
                    Ok(topics) => theme::display_topics(&topics),
                    Err(err) => println!("{}", format!("No topics: {err}").yellow()),
                }
            } else {
                config.require_llm()?;
                let llm = Arc::new(OpenAiClient::new(&config.llm_endpoint, &config.llm_api_key));
                let mut extractor = TopicExtractor::new(llm, &config.llm_model);
                extractor.max_topics = max_topics;
                extractor.max_keywords = max_keywords;

                let themes = extractor.extract_topics(&text).await;
                if themes.is_empty() {
                    println!(
                        "{}",
                        "No topics could be extracted from this corpus.".yellow()
                    );
                } else {
                    theme::display_themes(&themes);
                }
            }
        }

        Commands::Ask { file, question } => {
            config.require_llm()?;
            let text = read_corpus(&file)?;
            let llm = Arc::new(OpenAiClient::new(&config.llm_endpoint, &config.llm_api_key));

            let extractor = TopicExtractor::new(llm.clone(), &config.llm_model);
            let themes = extractor.extract_topics(&text).await;

            let answer =
                analysis::answer_question(llm.as_ref(), &config.llm_model, &text, &themes, &question)
                    .await?;
            println!("{answer}");
        }

        Commands::Summarize { file } => {
            config.require_llm()?;
            let text = read_corpus(&file)?;
            let llm = OpenAiClient::new(&config.llm_endpoint, &config.llm_api_key);

            let summary = analysis::summarize(&llm, &config.summary_model, &text).await?;
            println!("{summary}");
        }
    }

    Ok(())
}
