//! Recommendation and query-parsing backends.

pub mod cloud;
#[cfg(feature = "inference")]
pub mod inference;
pub mod local;
pub mod transport;

use async_trait::async_trait;

use crate::error::{DiscoveryError, Result};
use crate::models::{ChatMessage, MovieSummary, ParsedQuery, ProviderKind, Recommendation};

pub use cloud::CloudProvider;
#[cfg(feature = "inference")]
pub use inference::InferenceProvider;
pub use local::LocalProvider;
pub use transport::{ChatTransport, CompletionRequest};
#[cfg(feature = "rig")]
pub use transport::RigTransport;

/// Core trait implemented by every provider tier.
///
/// Operations a provider cannot serve return [`DiscoveryError::Unsupported`],
/// which the router treats as "try the next tier".
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Recommendations for the given favorites, optionally steered by free-text preferences.
    async fn recommend(
        &self,
        favorites: &[MovieSummary],
        preferences: Option<&str>,
    ) -> Result<Vec<Recommendation>>;

    async fn parse_query(&self, _query: &str) -> Result<ParsedQuery> {
        Err(self.unsupported("query parsing"))
    }

    async fn test_connection(&self) -> Result<String> {
        Err(self.unsupported("connection test"))
    }

    async fn summarize(&self, _movie: &MovieSummary) -> Result<String> {
        Err(self.unsupported("movie summary"))
    }

    async fn chat(&self, _message: &str, _history: &[ChatMessage]) -> Result<String> {
        Err(self.unsupported("chat"))
    }

    fn unsupported(&self, operation: &'static str) -> DiscoveryError {
        DiscoveryError::Unsupported {
            provider: self.kind(),
            operation,
        }
    }
}

/// Pulls the outermost `open`..`close` delimited span out of model output,
/// tolerating code fences and chatter around it.
pub(crate) fn extract_json(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    (end > start).then(|| &raw[start..=end])
}
