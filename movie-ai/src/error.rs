use thiserror::Error;

use crate::models::ProviderKind;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("No AI provider configured: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Could not parse provider response: {0}")]
    Parse(String),

    #[error("Connection test failed: {0}")]
    Connectivity(String),

    #[error("Catalog has {found} distinct recommendation titles, at least {required} are required")]
    InsufficientCandidates { found: usize, required: usize },

    #[error("{provider} provider does not support {operation}")]
    Unsupported {
        provider: ProviderKind,
        operation: &'static str,
    },
}

impl DiscoveryError {
    /// Whether the router should move on to the next provider tier.
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(
            self,
            DiscoveryError::Transport(_)
                | DiscoveryError::Parse(_)
                | DiscoveryError::Unsupported { .. }
        )
    }

    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            DiscoveryError::Configuration(_) => "No AI service configured".to_string(),
            DiscoveryError::Input(msg) => msg.clone(),
            DiscoveryError::Transport(_) | DiscoveryError::Parse(_) => {
                "The AI service is unavailable right now, please try again".to_string()
            }
            DiscoveryError::Connectivity(_) => "Could not reach the AI service".to_string(),
            DiscoveryError::InsufficientCandidates { .. } => {
                "Recommendations are unavailable".to_string()
            }
            DiscoveryError::Unsupported { operation, .. } => {
                format!("{operation} is not available with the current AI configuration")
            }
        }
    }
}

#[cfg(feature = "inference")]
impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        DiscoveryError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
