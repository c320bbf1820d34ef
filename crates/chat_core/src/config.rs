use serde::{Deserialize, Serialize};

/// Backend endpoint configuration.
///
/// Layered load: built-in defaults, then an optional `config.toml` in the
/// working directory, then environment overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the fusion backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the streaming (SSE) endpoint.
    #[serde(default = "default_stream_path")]
    pub stream_path: String,
    /// Path of the batch (single JSON response) endpoint.
    #[serde(default = "default_generate_path")]
    pub generate_path: String,
    /// Use the streaming endpoint; `false` selects the batch endpoint.
    #[serde(default = "default_streaming")]
    pub streaming: bool,
    /// Seconds without a single protocol event before the request is
    /// treated as a transport failure.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

const CONFIG_FILE_PATH: &str = "config.toml";

const DEFAULT_BASE_URL: &str = "https://ae-backend-kel6.onrender.com";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_stream_path() -> String {
    "/generate-stream".to_string()
}

fn default_generate_path() -> String {
    "/generate".to_string()
}

fn default_streaming() -> bool {
    true
}

fn default_idle_timeout_secs() -> u64 {
    120
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stream_path: default_stream_path(),
            generate_path: default_generate_path(),
            streaming: default_streaming(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let mut config = Config::default();

        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            match std::fs::read_to_string(CONFIG_FILE_PATH) {
                Ok(content) => match toml::from_str::<Config>(&content) {
                    Ok(file_config) => config = file_config,
                    Err(err) => {
                        log::warn!("Failed to parse {}: {}", CONFIG_FILE_PATH, err);
                    }
                },
                Err(err) => {
                    log::warn!("Failed to read {}: {}", CONFIG_FILE_PATH, err);
                }
            }
        }

        if let Ok(base_url) = std::env::var("FUSION_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(streaming) = std::env::var("FUSION_STREAMING") {
            config.streaming = parse_bool_env(&streaming);
        }
        if let Ok(timeout) = std::env::var("FUSION_IDLE_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.trim().parse::<u64>() {
                config.idle_timeout_secs = secs;
            }
        }

        config
    }

    /// Full URL of the streaming endpoint.
    pub fn stream_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.stream_path)
    }

    /// Full URL of the batch endpoint.
    pub fn generate_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.generate_path
        )
    }
}
