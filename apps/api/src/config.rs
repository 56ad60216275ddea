use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Values that ship in sample config files and must never reach the API.
const PLACEHOLDER_KEYS: &[&str] = &["your-api-key-here", "YOUR_API_KEY"];

/// Application configuration.
///
/// Layering: built-in defaults, then the optional YAML file, then environment
/// variables. A missing or placeholder API key is not an error: the services
/// run in demo mode and answer from their deterministic templates.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub temperature: f32,
    pub llm_timeout_secs: u64,
    pub chat_max_history: usize,
    pub knowledge_dir: PathBuf,
    pub tarot_cards_file: PathBuf,
    pub tarot_max_cards: usize,
    /// Directory served under `/card_image`.
    pub tarot_image_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            llm_timeout_secs: 30,
            chat_max_history: 10,
            knowledge_dir: PathBuf::from("data"),
            tarot_cards_file: PathBuf::from("data/tarot_cards.json"),
            tarot_max_cards: 3,
            tarot_image_dir: PathBuf::from("card_image"),
            port: 5000,
            rust_log: "info".to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// YAML file layout
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub gemini: GeminiSection,
    pub chat: ChatSection,
    pub tarot: TarotSection,
    pub knowledge: KnowledgeSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeminiSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatSection {
    pub temperature: Option<f32>,
    pub max_history: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TarotSection {
    pub cards_file: Option<PathBuf>,
    pub max_cards_per_reading: Option<usize>,
    pub image_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KnowledgeSection {
    pub dir: Option<PathBuf>,
}

impl FileConfig {
    /// Reads the YAML config file. A missing or malformed file yields the
    /// empty config so the process still starts.
    pub fn read(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                info!("No config file at {} ({e}); using defaults", path.display());
                return Self::default();
            }
        };

        match serde_yaml_ng::from_str::<FileConfig>(&raw) {
            Ok(file) => {
                info!("Loaded config file {}", path.display());
                file
            }
            Err(e) => {
                warn!("Config file {} is malformed ({e}); using defaults", path.display());
                Self::default()
            }
        }
    }
}

impl Config {
    /// Loads `.env`, the YAML file named by `CONFIG_FILE`, then the process
    /// environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let file = FileConfig::read(Path::new(&path));
        let env: HashMap<String, String> = std::env::vars().collect();

        Self::from_sources(file, |key| env.get(key).cloned())
    }

    /// Merges a parsed config file with an environment lookup. Environment
    /// values win over file values.
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_key = env("GEMINI_API_KEY").or(file.gemini.api_key);

        Ok(Config {
            gemini_api_key: sanitize_api_key(api_key),
            gemini_model: env("GEMINI_MODEL")
                .or(file.gemini.model)
                .unwrap_or(defaults.gemini_model),
            gemini_base_url: env("GEMINI_BASE_URL")
                .or(file.gemini.base_url)
                .unwrap_or(defaults.gemini_base_url),
            temperature: parse_env(&env, "LLM_TEMPERATURE")?
                .or(file.chat.temperature)
                .unwrap_or(defaults.temperature),
            llm_timeout_secs: parse_env(&env, "LLM_TIMEOUT_SECS")?
                .or(file.gemini.timeout_secs)
                .unwrap_or(defaults.llm_timeout_secs),
            chat_max_history: parse_env(&env, "CHAT_MAX_HISTORY")?
                .or(file.chat.max_history)
                .unwrap_or(defaults.chat_max_history),
            knowledge_dir: env("KNOWLEDGE_DIR")
                .map(PathBuf::from)
                .or(file.knowledge.dir)
                .unwrap_or(defaults.knowledge_dir),
            tarot_cards_file: env("TAROT_CARDS_FILE")
                .map(PathBuf::from)
                .or(file.tarot.cards_file)
                .unwrap_or(defaults.tarot_cards_file),
            tarot_max_cards: parse_env(&env, "TAROT_MAX_CARDS")?
                .or(file.tarot.max_cards_per_reading)
                .unwrap_or(defaults.tarot_max_cards),
            tarot_image_dir: env("TAROT_IMAGE_DIR")
                .map(PathBuf::from)
                .or(file.tarot.image_dir)
                .unwrap_or(defaults.tarot_image_dir),
            port: parse_env(&env, "PORT")?.unwrap_or(defaults.port),
            rust_log: env("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    /// True when no usable API key is configured.
    pub fn demo_mode(&self) -> bool {
        self.gemini_api_key.is_none()
    }
}

fn sanitize_api_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && !PLACEHOLDER_KEYS.contains(&k.as_str()))
}

fn parse_env<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = Config::from_sources(FileConfig::default(), env_from(&[])).unwrap();
        assert!(config.demo_mode());
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert_eq!(config.port, 5000);
        assert_eq!(config.chat_max_history, 10);
        assert_eq!(config.tarot_max_cards, 3);
    }

    #[test]
    fn test_yaml_file_values_are_used() {
        let yaml = r#"
gemini:
  api_key: "real-key"
  model: "gemini-pro"
chat:
  temperature: 0.3
  max_history: 4
tarot:
  max_cards_per_reading: 5
  image_dir: "static/cards"
"#;
        let file: FileConfig = serde_yaml_ng::from_str(yaml).unwrap();
        let config = Config::from_sources(file, env_from(&[])).unwrap();

        assert_eq!(config.gemini_api_key.as_deref(), Some("real-key"));
        assert_eq!(config.gemini_model, "gemini-pro");
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.chat_max_history, 4);
        assert_eq!(config.tarot_max_cards, 5);
        assert_eq!(config.tarot_image_dir, PathBuf::from("static/cards"));
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = serde_yaml_ng::from_str("gemini:\n  model: gemini-pro\n").unwrap();
        let config = Config::from_sources(
            file,
            env_from(&[("GEMINI_MODEL", "gemini-2.0-flash"), ("PORT", "8088")]),
        )
        .unwrap();

        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.port, 8088);
    }

    #[test]
    fn test_placeholder_key_means_demo_mode() {
        for key in ["your-api-key-here", "YOUR_API_KEY", "   "] {
            let config =
                Config::from_sources(FileConfig::default(), env_from(&[("GEMINI_API_KEY", key)]))
                    .unwrap();
            assert!(config.demo_mode(), "key {key:?} should be treated as absent");
        }
    }

    #[test]
    fn test_invalid_numeric_env_is_an_error() {
        let err = Config::from_sources(FileConfig::default(), env_from(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = FileConfig::read(&dir.path().join("absent.yaml"));
        assert!(file.gemini.api_key.is_none());
    }

    #[test]
    fn test_malformed_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "gemini: [not, a, mapping").unwrap();

        let file = FileConfig::read(&path);
        assert!(file.gemini.model.is_none());
    }
}
