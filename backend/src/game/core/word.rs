use crate::error::ConfigError;
use rand::seq::IndexedRandom;

/// Words used when no list is configured
pub const DEFAULT_WORDS: &[&str] = &[
    "apple", "banana", "cat", "dog", "python", "rocket", "house", "keyboard",
];

/// Source of the secret word for a session
pub trait WordProvider {
    fn choose(&self) -> String;
}

/// A non-empty list of lower-case candidate words
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Normalizes every entry and drops blanks. Fails if nothing is left.
    pub fn new<I, S>(words: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(ConfigError::EmptyWordList);
        }

        Ok(Self { words })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl WordProvider for WordList {
    fn choose(&self) -> String {
        // Non-empty by construction
        self.words
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default()
    }
}
