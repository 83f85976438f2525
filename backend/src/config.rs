use crate::error::ConfigError;
use crate::game::core::{DEFAULT_WORDS, WordList};
use crate::game::relay::{ConnectionSettings, DEFAULT_OUTBOUND_BUFFER, DEFAULT_SEND_TIMEOUT};
use std::env;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 12000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub words: Vec<String>,
    pub outbound_buffer: usize,
    pub send_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable values fall back
    /// to defaults.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            words: var("WORDS")
                .map(|w| w.split(',').map(str::to_string).collect())
                .unwrap_or(defaults.words),
            outbound_buffer: var("OUTBOUND_BUFFER")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.outbound_buffer),
            send_timeout: var("SEND_TIMEOUT_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.send_timeout),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn word_list(&self) -> Result<WordList, ConfigError> {
        WordList::new(&self.words)
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            outbound_buffer: self.outbound_buffer,
            send_timeout: self.send_timeout,
        }
    }
}
