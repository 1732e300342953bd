//! Text helpers for reading [`BladeMsg`] payloads.
//!
//! All comparisons work on the "raw" form of a payload: line endings folded to
//! `\n`, surrounding whitespace trimmed, lowercased. None of these functions
//! hold state; an absent payload never matches anything.

use crate::message::BladeMsg;

/// Words that mark a payload as a question when it starts with one of them.
pub const QUESTION_WORDS: [&str; 7] = ["who", "what", "why", "where", "when", "which", "how"];

/// Characters that split a payload into words for keyword matching.
pub const WORD_SEPARATORS: &[char] = &[
    ' ', '\t', '\r', '\n', '.', ',', ';', ':', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}',
];

/// Fold Windows line endings into `\n`. The origin is kept as is.
pub fn normalize(msg: &BladeMsg) -> BladeMsg {
    BladeMsg {
        origin: msg.origin.clone(),
        data: msg.data.as_ref().map(|d| d.replace("\r\n", "\n")),
    }
}

/// The normalized payload, trimmed and lowercased.
pub fn raw(msg: &BladeMsg) -> Option<String> {
    normalize(msg).data.map(|d| d.trim().to_lowercase())
}

/// Whether a payload is most likely a question (case insensitive).
pub fn looks_like_question(msg: &BladeMsg) -> bool {
    let Some(raw) = raw(msg) else {
        return false;
    };
    raw.contains('?') || QUESTION_WORDS.iter().any(|w| raw.starts_with(w))
}

/// The words of a payload, split on [`WORD_SEPARATORS`].
pub fn words(msg: &BladeMsg) -> Option<Vec<String>> {
    raw(msg).map(|raw| {
        raw.split(WORD_SEPARATORS)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Whether every keyword appears as a whole word in the payload (case insensitive).
pub fn has_all_keywords(msg: &BladeMsg, keywords: &[&str]) -> bool {
    let Some(words) = words(msg) else {
        return false;
    };
    keywords.iter().all(|k| {
        let k = k.to_lowercase();
        words.iter().any(|w| *w == k)
    })
}
