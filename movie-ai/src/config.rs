use std::time::Duration;

/// Placeholder credential shipped in example env files; treated as absent.
pub const PLACEHOLDER_API_KEY: &str = "your_openrouter_api_key_here";

pub const DEFAULT_CLOUD_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_INFERENCE_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Which family of providers the router should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    /// Free inference API first, then the local rule engine.
    Local,
    /// Cloud LLM first, then the local rule engine.
    Cloud,
}

/// Provider configuration, resolved once at start-up and handed to the router.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub use_local_ai: bool,
    pub cloud_api_key: Option<String>,
    pub cloud_model: String,
    pub inference_enabled: bool,
    pub inference_url: String,
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            use_local_ai: false,
            cloud_api_key: None,
            cloud_model: DEFAULT_CLOUD_MODEL.to_string(),
            inference_enabled: true,
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProviderConfig {
    /// Local rule engine (plus free inference) only.
    pub fn local() -> Self {
        Self {
            use_local_ai: true,
            ..Self::default()
        }
    }

    pub fn cloud(api_key: impl Into<String>) -> Self {
        Self {
            cloud_api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Recognised keys: `USE_LOCAL_AI`, `OPENROUTER_API_KEY`, `CLOUD_MODEL`,
    /// `HF_INFERENCE_ENABLED`, `HF_INFERENCE_URL`, `AI_REQUEST_TIMEOUT_SECS`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str| lookup(key).map(|v| v.trim().eq_ignore_ascii_case("true"));

        Self {
            use_local_ai: flag("USE_LOCAL_AI").unwrap_or(false),
            cloud_api_key: lookup("OPENROUTER_API_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            cloud_model: lookup("CLOUD_MODEL").unwrap_or(defaults.cloud_model),
            inference_enabled: flag("HF_INFERENCE_ENABLED").unwrap_or(defaults.inference_enabled),
            inference_url: lookup("HF_INFERENCE_URL").unwrap_or(defaults.inference_url),
            request_timeout: lookup("AI_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// The cloud key, unless it is missing or still the placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.cloud_api_key
            .as_deref()
            .filter(|key| *key != PLACEHOLDER_API_KEY)
    }

    pub fn is_ai_enabled(&self) -> bool {
        self.use_local_ai || self.usable_api_key().is_some()
    }

    /// Local mode takes precedence over a configured cloud key.
    pub fn mode(&self) -> Option<ProviderMode> {
        if self.use_local_ai {
            Some(ProviderMode::Local)
        } else if self.usable_api_key().is_some() {
            Some(ProviderMode::Cloud)
        } else {
            None
        }
    }
}
