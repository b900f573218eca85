//! AIProviderRouter – tries provider tiers in priority order and falls back on failure.
//!
//! The provider list is fixed at construction time. For every call the router walks the list
//! strictly in order, one provider at a time:
//!
//! * **recommend / parse_query**: transport, parse and "unsupported" failures move on to the
//!   next tier. The local rule engine sits last and does not fail on valid input, so these calls
//!   only ever fail with a configuration or input error.
//! * **test_connection**: the first provider that supports it answers for the whole chain. A
//!   cloud failure is reported as a connectivity error rather than masked by the local tier.
//! * **summarize / chat**: only the cloud tier implements them; failures are surfaced.
//!
//! ```rust,no_run
//! # async fn demo() -> movie_ai::Result<()> {
//! use movie_ai::{AIProviderRouter, MovieSummary, ProviderConfig};
//!
//! let router = AIProviderRouter::from_config(&ProviderConfig::from_env())?;
//! let favorites = vec![MovieSummary::new(76341, "Mad Max: Fury Road", vec![28])];
//! let routed = router.recommend(&favorites, None).await?;
//! println!("{} picks from {}", routed.value.len(), routed.provider);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::RECOMMENDATION_COUNT;
use crate::config::{ProviderConfig, ProviderMode};
use crate::engine::RecommendationEngine;
use crate::error::{DiscoveryError, Result};
use crate::models::{ChatMessage, MovieSummary, ParsedQuery, ProviderKind, Recommendation, Routed};
use crate::provider::{LocalProvider, Provider};

#[derive(Clone)]
pub struct AIProviderRouter {
    providers: Vec<Arc<dyn Provider>>,
    engine: RecommendationEngine,
}

impl AIProviderRouter {
    /// Router over an explicit provider chain, highest priority first.
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self {
            providers,
            engine: RecommendationEngine::default(),
        }
    }

    /// Uses `engine` when remote results need topping up to a full list.
    pub fn with_engine(mut self, engine: RecommendationEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Builds the provider chain selected by `config`.
    ///
    /// With AI disabled the chain is empty and every operation reports a
    /// configuration error.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let engine = RecommendationEngine::default();
        let local: Arc<dyn Provider> = Arc::new(LocalProvider::new(engine.clone()));
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        match config.mode() {
            Some(ProviderMode::Local) => {
                if config.inference_enabled {
                    push_inference(&mut providers, config)?;
                }
                providers.push(local);
            }
            Some(ProviderMode::Cloud) => {
                push_cloud(&mut providers, config);
                providers.push(local);
            }
            None => warn!("No AI provider configured"),
        }

        info!(
            providers = ?providers.iter().map(|p| p.kind()).collect::<Vec<_>>(),
            "Provider chain ready"
        );
        Ok(Self::new(providers).with_engine(engine))
    }

    pub fn is_ai_enabled(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.providers.is_empty() {
            return Err(DiscoveryError::Configuration(
                "No AI service configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Five recommendations from the highest-priority provider that succeeds.
    pub async fn recommend(
        &self,
        favorites: &[MovieSummary],
        preferences: Option<&str>,
    ) -> Result<Routed<Vec<Recommendation>>> {
        self.ensure_configured()?;
        if favorites.is_empty() {
            return Err(DiscoveryError::Input(
                "Please add some favorite movies first".to_string(),
            ));
        }

        let mut last_error = None;
        for provider in &self.providers {
            let kind = provider.kind();
            let attempt = match provider.recommend(favorites, preferences).await {
                Ok(recs) if kind == ProviderKind::Local => Ok(recs),
                Ok(recs) => self.complete_remote(recs, favorites),
                Err(e) => Err(e),
            };
            match attempt {
                Ok(value) => {
                    info!(provider = %kind, count = value.len(), "Recommendations ready");
                    return Ok(Routed {
                        value,
                        provider: kind,
                    });
                }
                Err(e) if e.is_fallback_trigger() => {
                    warn!(provider = %kind, error = %e, "Provider failed, falling back");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(exhausted(last_error))
    }

    /// Structured search parameters from the highest-priority provider that succeeds.
    pub async fn parse_query(&self, query: &str) -> Result<Routed<ParsedQuery>> {
        self.ensure_configured()?;

        let mut last_error = None;
        for provider in &self.providers {
            let kind = provider.kind();
            match provider.parse_query(query).await {
                Ok(parsed) => {
                    info!(provider = %kind, search_terms = %parsed.search_terms, "Query parsed");
                    return Ok(Routed {
                        value: parsed,
                        provider: kind,
                    });
                }
                Err(e) if e.is_fallback_trigger() => {
                    if !matches!(e, DiscoveryError::Unsupported { .. }) {
                        warn!(provider = %kind, error = %e, "Query parsing failed, falling back");
                    }
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(exhausted(last_error))
    }

    pub async fn test_connection(&self) -> Result<Routed<String>> {
        self.ensure_configured()?;

        for provider in &self.providers {
            let kind = provider.kind();
            match provider.test_connection().await {
                Ok(message) => {
                    return Ok(Routed {
                        value: message,
                        provider: kind,
                    });
                }
                Err(DiscoveryError::Unsupported { .. }) => continue,
                Err(e @ DiscoveryError::Connectivity(_)) => return Err(e),
                Err(e) => return Err(DiscoveryError::Connectivity(e.to_string())),
            }
        }
        Err(DiscoveryError::Connectivity(
            "No provider supports connection tests".to_string(),
        ))
    }

    /// Short engaging summary of `movie`.
    pub async fn summarize(&self, movie: &MovieSummary) -> Result<Routed<String>> {
        self.ensure_configured()?;
        let mut last_error = None;
        for provider in &self.providers {
            match provider.summarize(movie).await {
                Ok(summary) => {
                    return Ok(Routed {
                        value: summary,
                        provider: provider.kind(),
                    });
                }
                Err(e @ DiscoveryError::Unsupported { .. }) => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(exhausted(last_error))
    }

    /// Movie chatbot reply, given the conversation so far.
    pub async fn chat(&self, message: &str, history: &[ChatMessage]) -> Result<Routed<String>> {
        self.ensure_configured()?;
        if message.trim().is_empty() {
            return Err(DiscoveryError::Input("Message must not be empty".to_string()));
        }
        let mut last_error = None;
        for provider in &self.providers {
            match provider.chat(message, history).await {
                Ok(reply) => {
                    return Ok(Routed {
                        value: reply,
                        provider: provider.kind(),
                    });
                }
                Err(e @ DiscoveryError::Unsupported { .. }) => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(exhausted(last_error))
    }

    /// Normalises a remote tier's list: drops blank and repeated titles, caps
    /// the length and tops up from the local engine.
    fn complete_remote(
        &self,
        recommendations: Vec<Recommendation>,
        favorites: &[MovieSummary],
    ) -> Result<Vec<Recommendation>> {
        let mut seen = HashSet::new();
        let mut cleaned: Vec<Recommendation> = recommendations
            .into_iter()
            .filter_map(|rec| {
                let title = rec.title.trim().to_string();
                if title.is_empty() || !seen.insert(title.to_lowercase()) {
                    return None;
                }
                Some(Recommendation::new(title, rec.reason.trim()))
            })
            .collect();

        if cleaned.is_empty() {
            return Err(DiscoveryError::Parse(
                "Provider returned no usable recommendations".to_string(),
            ));
        }
        cleaned.truncate(RECOMMENDATION_COUNT);
        self.engine.top_up(cleaned, favorites)
    }
}

fn exhausted(last_error: Option<DiscoveryError>) -> DiscoveryError {
    last_error.unwrap_or_else(|| {
        DiscoveryError::Configuration("No AI service configured".to_string())
    })
}

#[cfg(feature = "inference")]
fn push_inference(providers: &mut Vec<Arc<dyn Provider>>, config: &ProviderConfig) -> Result<()> {
    let inference =
        crate::provider::InferenceProvider::new(&config.inference_url, config.request_timeout)?;
    providers.push(Arc::new(inference));
    Ok(())
}

#[cfg(not(feature = "inference"))]
fn push_inference(_providers: &mut Vec<Arc<dyn Provider>>, _config: &ProviderConfig) -> Result<()> {
    warn!("Built without the `inference` feature, skipping free inference tier");
    Ok(())
}

#[cfg(feature = "rig")]
fn push_cloud(providers: &mut Vec<Arc<dyn Provider>>, config: &ProviderConfig) {
    if let Some(api_key) = config.usable_api_key() {
        let transport = crate::provider::RigTransport::new(api_key, config.cloud_model.clone());
        providers.push(Arc::new(crate::provider::CloudProvider::new(Arc::new(
            transport,
        ))));
    }
}

#[cfg(not(feature = "rig"))]
fn push_cloud(_providers: &mut Vec<Arc<dyn Provider>>, _config: &ProviderConfig) {
    warn!("Built without the `rig` feature, skipping cloud tier");
}
