use serde::Serialize;
use thiserror::Error;
use url::Url;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";
pub const MODEL_VAR: &str = "GEMINI_MODEL";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set your GEMINI_API_KEY in the .env file")]
    MissingApiKey,
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Sampling and length controls sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: "text/plain".to_string(),
        }
    }
}

/// Process-wide settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base: Url,
    pub model: String,
    pub generation: GenerationConfig,
}

impl Settings {
    /// Builds settings from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;

        let api_base = get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(&api_base).map_err(|source| ConfigError::InvalidUrl {
            var: API_BASE_VAR,
            source,
        })?;

        let model = get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            api_base,
            model,
            generation: GenerationConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = Settings::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert_eq!(err.to_string(), "Please set your GEMINI_API_KEY in the .env file");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = Settings::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn defaults_apply() {
        let settings = Settings::from_lookup(lookup(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.api_base.as_str(), DEFAULT_API_BASE);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.generation, GenerationConfig::default());
        assert_eq!(settings.generation.top_k, 40);
        assert_eq!(settings.generation.max_output_tokens, 8192);
    }

    #[test]
    fn overrides_apply() {
        let settings = Settings::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (API_BASE_VAR, "http://127.0.0.1:9999/"),
            (MODEL_VAR, "gemini-2.0-flash"),
        ]))
        .unwrap();
        assert_eq!(settings.api_base.as_str(), "http://127.0.0.1:9999/");
        assert_eq!(settings.model, "gemini-2.0-flash");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = Settings::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (API_BASE_VAR, "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: API_BASE_VAR, .. }));
    }

    #[test]
    fn generation_config_serializes_camel_case() {
        let value = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(value["topP"], serde_json::json!(0.95));
        assert_eq!(value["maxOutputTokens"], serde_json::json!(8192));
        assert_eq!(value["responseMimeType"], serde_json::json!("text/plain"));
    }
}
