//! Exit-phrase detection.
//!
//! Matching is plain substring containment on the lowercased text, with no
//! word-boundary check. "thanks" inside an unrelated sentence ends the call.

/// Phrases that end the conversation.
pub const EXIT_PHRASES: [&str; 6] = [
    "done",
    "finish",
    "bye",
    "thank you",
    "thanks",
    "no that is all",
];

/// Returns the first exit phrase contained in `text`, if any.
pub fn matched_phrase(text: &str) -> Option<&'static str> {
    let normalized = text.to_lowercase();
    EXIT_PHRASES
        .iter()
        .copied()
        .find(|phrase| normalized.contains(phrase))
}

/// Returns `true` if `text` should end the conversation.
pub fn should_end(text: &str) -> bool {
    matched_phrase(text).is_some()
}
