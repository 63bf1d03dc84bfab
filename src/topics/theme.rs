// Topic and theme types — the structured output of the pipeline.
//
// A Topic is the raw statistical result: ranked keywords with weights from
// one NMF component. A Theme is what the LLM makes of it: a label plus a
// short description.

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// One weighted vocabulary term inside a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    /// Share of the topic's top-k weight mass, in [0, 1]
    pub weight: f64,
}

/// A raw topic from the NMF decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Ordinal position in the decomposition (0-based)
    pub index: usize,
    /// Top keywords in descending weight order; weights renormalized to
    /// sum to 1.0 over this truncated set
    pub keywords: Vec<Keyword>,
    /// Raw top-k weight mass before renormalization. Comparable across
    /// topics of the same extraction.
    pub score: f64,
}

/// An LLM-labeled theme. Many raw topics may collapse into fewer themes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub label: String,
    pub description: String,
}

impl Topic {
    /// Render as `term (0.32), term (0.21), ...` for prompts and logs.
    pub fn summary(&self) -> String {
        self.keywords
            .iter()
            .map(|k| format!("{} ({:.2})", k.term, k.weight))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Print raw topics as weight bars, in decomposition order.
///
/// Bars show each topic's share of the total score mass, so a corpus
/// dominated by one theme is visible at a glance.
pub fn display_topics(topics: &[Topic]) {
    println!(
        "\n{}",
        format!("=== Raw topics ({} extracted) ===", topics.len()).bold()
    );
    println!();

    let total: f64 = topics.iter().map(|t| t.score).sum();
    let bar_width: usize = 20;

    for topic in topics {
        let share = if total > 0.0 { topic.score / total } else { 0.0 };
        let filled = (share * bar_width as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.min(bar_width)),
            " ".repeat(bar_width.saturating_sub(filled))
        );

        let colored_bar = if share >= 0.25 {
            bar.bright_green()
        } else if share >= 0.10 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>2}. {} score {:.2}",
            topic.index + 1,
            colored_bar,
            topic.score
        );
        println!("      {}", topic.summary().dimmed());
        println!();
    }
}

/// Print interpreted themes as a numbered list.
pub fn display_themes(themes: &[Theme]) {
    println!(
        "\n{}",
        format!("=== Themes ({} identified) ===", themes.len()).bold()
    );
    println!();

    for (i, theme) in themes.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, theme.label.bold());
        println!("      {}", theme.description.dimmed());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_formats_keywords_in_order() {
        let topic = Topic {
            index: 0,
            keywords: vec![
                Keyword {
                    term: "contract".to_string(),
                    weight: 0.6,
                },
                Keyword {
                    term: "review".to_string(),
                    weight: 0.4,
                },
            ],
            score: 1.8,
        };
        assert_eq!(topic.summary(), "contract (0.60), review (0.40)");
    }

    #[test]
    fn theme_round_trips_through_json() {
        let themes = vec![Theme {
            label: "Contract management".to_string(),
            description: "Questions about drafting and reviewing contracts.".to_string(),
        }];
        let json = serde_json::to_string(&themes).unwrap();
        let back: Vec<Theme> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, themes);
    }
}
