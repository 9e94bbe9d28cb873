use anyhow::{Context, Result};
use std::env;

const DEFAULT_GENERATION_MODEL: &str = "models/gemini-flash-latest";
const DEFAULT_FALLBACK_MODEL: &str = "models/gemini-pro-latest";
const DEFAULT_EMBEDDING_MODEL: &str = "models/gemini-embedding-001";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub generation_model: String,
    pub fallback_model: String,
    pub embedding_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let gemini_api_key = env::var("GEMINI_API_KEY").context(
            "GEMINI_API_KEY not found.\n\n\
            To fix this, create ~/.config/briefing-curator/.env with:\n  \
            GEMINI_API_KEY=your_key_here\n\n\
            Get your API key from: https://aistudio.google.com/apikey",
        )?;

        Ok(Self {
            gemini_api_key,
            generation_model: env::var("GEMINI_GENERATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string()),
            fallback_model: env::var("GEMINI_FALLBACK_MODEL")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_MODEL.to_string()),
            embedding_model: env::var("GEMINI_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
        })
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/briefing-curator/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("briefing-curator").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}
