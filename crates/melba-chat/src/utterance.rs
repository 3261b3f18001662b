//! Utterance normalization and the predicates the responder rules use.
//!
//! All matching is plain English substring matching on the trimmed,
//! lower-cased text. Greeting and affirmative detection anchor at the start
//! of the message and require a word boundary.

use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// Compiled patterns (compiled once, reused across calls)
// =============================================================================

static GREETING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:hi|hello|hey|good morning|good afternoon|good evening)\b")
        .expect("Invalid greeting regex")
});

static AFFIRMATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:yes|yeah|yep|sure|ok|okay|i am|i do)\b").expect("Invalid affirmative regex")
});

/// Minimum digit count that counts as a phone number.
const PHONE_MIN_DIGITS: usize = 10;

// =============================================================================
// Utterance
// =============================================================================

/// A normalized user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    text: String,
    char_len: usize,
}

impl Utterance {
    /// Trim and lower-case raw input.
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_lowercase();
        let char_len = text.chars().count();
        Self { text, char_len }
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Whether the text contains any of `keywords` as a substring.
    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.text.contains(k))
    }

    /// Whether the text is exactly one of `words`.
    pub fn is_one_of(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.text == *w)
    }

    pub fn is_greeting(&self) -> bool {
        GREETING_RE.is_match(&self.text) || self.text.contains("how are you")
    }

    pub fn is_affirmative(&self) -> bool {
        AFFIRMATIVE_RE.is_match(&self.text)
    }

    /// An email address marker or a run of at least ten digits once every
    /// non-digit is stripped.
    pub fn has_contact_info(&self) -> bool {
        if self.text.contains('@') {
            return true;
        }
        self.text.chars().filter(|c| c.is_ascii_digit()).count() >= PHONE_MIN_DIGITS
    }

    pub fn has_alphanumeric(&self) -> bool {
        self.text.chars().any(char::is_alphanumeric)
    }

    pub fn has_letters(&self) -> bool {
        self.text.chars().any(char::is_alphabetic)
    }
}

// =============================================================================
// Tests
// =============================================================================
