use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the intelligence oracle backend.
    pub oracle_api_key: String,

    /// Model identifier passed to the oracle backend.
    pub oracle_model: String,

    /// Where the desk state blob is written.
    pub state_path: PathBuf,
}

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_STATE_PATH: &str = "signaldesk_state.json";

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            oracle_api_key: required_env("GEMINI_API_KEY"),
            oracle_model: env::var("ORACLE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            state_path: env::var("SIGNALDESK_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH)),
        }
    }

    /// Load a config for read-only commands (no oracle key needed).
    pub fn read_only_from_env() -> Self {
        Self {
            oracle_api_key: String::new(),
            oracle_model: env::var("ORACLE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            state_path: env::var("SIGNALDESK_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH)),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
