// Unit tests for the preprocessor contract.
//
// The cleaning step feeds cached summaries and prompts downstream, so its
// guarantees (idempotence, restricted output alphabet, stopword removal)
// are pinned here.

use promptquest::preprocess::Preprocessor;

#[test]
fn clean_handles_empty_input() {
    let pre = Preprocessor::default();
    assert_eq!(pre.clean(""), "");
}

#[test]
fn clean_reduces_symbol_soup_to_empty() {
    let pre = Preprocessor::default();
    assert_eq!(pre.clean("@#$%^&* ()!"), "");
}

#[test]
fn clean_collapses_whitespace_runs() {
    let pre = Preprocessor::default();
    let out = pre.clean("billing   invoice\t\trefund\n\npolicy");
    assert_eq!(out, "billing invoice refund policy");
}

#[test]
fn clean_is_idempotent_over_varied_inputs() {
    let pre = Preprocessor::default();
    let inputs = [
        "",
        "plain text without noise",
        "Mixed CASE with The Stopwords And Punctuation!!!",
        "unicode: café déjà-vu — naïve",
        "numbers 123 and ids abc123",
        "   leading and trailing   ",
    ];
    for input in inputs {
        let once = pre.clean(input);
        let twice = pre.clean(&once);
        assert_eq!(twice, once, "clean not idempotent for {input:?}");
    }
}

#[test]
fn clean_output_alphabet_is_restricted() {
    let pre = Preprocessor::default();
    let inputs = [
        "emails a@b.com and urls https://x.io/path?q=1",
        "smart “quotes” and em—dashes",
        "tabs\tand\nnewlines",
    ];
    for input in inputs {
        let out = pre.clean(input);
        assert!(
            out.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '),
            "unexpected character in {out:?} (from {input:?})"
        );
    }
}

#[test]
fn clean_drops_stopwords_case_insensitively() {
    let pre = Preprocessor::default();
    let out = pre.clean("The contract AND the invoice");
    let tokens: Vec<&str> = out.split_whitespace().collect();
    assert!(tokens.contains(&"contract"));
    assert!(tokens.contains(&"invoice"));
    assert!(!tokens.iter().any(|t| t.eq_ignore_ascii_case("the")));
    assert!(!tokens.iter().any(|t| t.eq_ignore_ascii_case("and")));
}

#[test]
fn normalize_drops_digits_and_short_tokens() {
    let pre = Preprocessor::default();
    let out = pre.normalize("Q3 42 ok billing invoice");
    assert!(!out.contains('4'));
    assert!(!out.split_whitespace().any(|t| t.len() <= 2));
    assert!(out.contains("bill")); // stemmed form of "billing"
}
