//! Configuration management for the Highlighter server

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub output: OutputConfig,
    pub oracle: OracleConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where annotated documents are written and how they are addressed publicly
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Absolute base URL the server is reachable at, e.g. `http://127.0.0.1:8000`
    pub public_base_url: String,
}

/// Selection oracle (OpenAI-compatible chat completions endpoint)
#[derive(Clone)]
pub struct OracleConfig {
    pub endpoint: String,
    /// Credential; absence is only detected on the first oracle call
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    /// Extra attempts after the first one on transient failures
    pub max_retries: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
}

/// Path prefix the output directory is served under
pub const OUTPUTS_PATH: &str = "/outputs";

impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            output: OutputConfig {
                dir: PathBuf::from("outputs"),
                public_base_url: "http://127.0.0.1:8000".to_string(),
            },
            oracle: OracleConfig::default(),
            limits: LimitsConfig {
                max_upload_bytes: 10 * 1024 * 1024,
            },
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            endpoint: "https://api.openai.com".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            max_retries: 2,
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Build the configuration from process environment, falling back to
    /// defaults for anything unset.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port),
            },
            output: OutputConfig {
                dir: env::var("OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.output.dir),
                public_base_url: env::var("PUBLIC_BASE_URL")
                    .unwrap_or(defaults.output.public_base_url),
            },
            oracle: OracleConfig {
                endpoint: env::var("LLM_ENDPOINT").unwrap_or(defaults.oracle.endpoint),
                api_key: env::var("LLM_API_KEY")
                    .or_else(|_| env::var("OPENAI_API_KEY"))
                    .ok()
                    .filter(|k| !k.trim().is_empty()),
                model: env::var("LLM_MODEL").unwrap_or(defaults.oracle.model),
                temperature: parse_var("LLM_TEMPERATURE", defaults.oracle.temperature),
                max_retries: parse_var("LLM_MAX_RETRIES", defaults.oracle.max_retries),
                timeout_secs: parse_var("LLM_TIMEOUT_SECS", defaults.oracle.timeout_secs),
            },
            limits: LimitsConfig {
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.limits.max_upload_bytes),
            },
        }
    }
}

impl OutputConfig {
    /// Public URL of a file stored in the output directory
    pub fn file_url(&self, name: &str) -> String {
        format!(
            "{}{}/{}",
            self.public_base_url.trim_end_matches('/'),
            OUTPUTS_PATH,
            name
        )
    }
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
