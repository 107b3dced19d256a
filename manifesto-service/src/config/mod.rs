use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Upper bound on a single model call when `GENAI_TIMEOUT_SECS` is unset.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[derive(Debug, Clone)]
pub struct ManifestoConfig {
    pub common: core_config::Config,
    pub models: ModelConfig,
    pub google: GoogleConfig,
    pub generation: GenerationSettings,
    pub observability: ObservabilityConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model used for manifesto drafting (e.g., gemini-2.5-flash)
    pub text_model: String,
    /// Base URL of the generative language API
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Directory served under `/static`
    pub static_dir: String,
}

impl ManifestoConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. `load` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        Ok(ManifestoConfig {
            common,
            models: ModelConfig {
                text_model: get("GENAI_TEXT_MODEL", Some("gemini-2.5-flash"))?,
                api_base: get("GENAI_API_BASE", Some(DEFAULT_API_BASE))?,
            },
            google: GoogleConfig {
                api_key: Secret::new(get("GOOGLE_API_KEY", None)?),
            },
            generation: GenerationSettings {
                timeout_secs: parse_value(
                    "GENAI_TIMEOUT_SECS",
                    &get("GENAI_TIMEOUT_SECS", Some(&DEFAULT_TIMEOUT_SECS.to_string()))?,
                )?,
                temperature: parse_optional(&lookup, "GENAI_TEMPERATURE")?,
                top_p: parse_optional(&lookup, "GENAI_TOP_P")?,
                max_output_tokens: parse_optional(&lookup, "GENAI_MAX_OUTPUT_TOKENS")?,
            },
            observability: ObservabilityConfig {
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.is_empty()),
            },
            web: WebConfig {
                static_dir: get("STATIC_DIR", Some(DEFAULT_STATIC_DIR))?,
            },
        })
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => parse_value(key, &raw).map(Some),
        _ => Ok(None),
    }
}
