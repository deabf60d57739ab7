use std::sync::OnceLock;

use regex::Regex;

/// Sentence pattern: any run of text up to and including terminal punctuation
fn sentence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]+").expect("must be valid regex"))
}

/// Split text into sentences for piecewise synthesis
///
/// Text with no sentence-final punctuation comes back as a single piece.
/// Trailing text after the last terminator is dropped, matching how the
/// UI feeds only finished sentences to synthesis.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let pieces: Vec<String> = sentence().find_iter(text).map(|m| m.as_str().to_owned()).collect();

    if pieces.is_empty() {
        vec![text.to_owned()]
    } else {
        pieces
    }
}
