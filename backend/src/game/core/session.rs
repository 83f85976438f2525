use super::word::WordProvider;

/// The single game session of this process (pure logic, no I/O).
///
/// The secret word is chosen once at construction and never changes, so the
/// session can be shared across connections without locking.
#[derive(Debug)]
pub struct SessionState {
    secret_word: String,
}

impl SessionState {
    /// Start a session with a word drawn from `words`
    pub fn new(words: &impl WordProvider) -> Self {
        Self::with_word(words.choose())
    }

    pub fn with_word(word: impl Into<String>) -> Self {
        Self {
            secret_word: word.into().trim().to_lowercase(),
        }
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    /// Case-insensitive, whitespace-trimming comparison against the secret word
    pub fn evaluate(&self, guess: &str) -> bool {
        guess.trim().to_lowercase() == self.secret_word
    }
}
