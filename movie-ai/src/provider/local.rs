use async_trait::async_trait;
use tracing::info;

use crate::engine::RecommendationEngine;
use crate::error::Result;
use crate::models::{MovieSummary, ParsedQuery, ProviderKind, Recommendation};
use crate::provider::Provider;
use crate::query::QueryParser;

pub const LOCAL_CONNECTION_MESSAGE: &str =
    "Local AI connection successful! Using rule-based recommendations.";

/// Terminal tier: rule engine and query parser, no network access.
#[derive(Debug, Clone, Default)]
pub struct LocalProvider {
    engine: RecommendationEngine,
    parser: QueryParser,
}

impl LocalProvider {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine,
            parser: QueryParser::new(),
        }
    }
}

#[async_trait]
impl Provider for LocalProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    async fn recommend(
        &self,
        favorites: &[MovieSummary],
        _preferences: Option<&str>,
    ) -> Result<Vec<Recommendation>> {
        info!(favorites = favorites.len(), "Using local rule engine for recommendations");
        self.engine.recommend(favorites)
    }

    async fn parse_query(&self, query: &str) -> Result<ParsedQuery> {
        Ok(self.parser.parse(query))
    }

    async fn test_connection(&self) -> Result<String> {
        Ok(LOCAL_CONNECTION_MESSAGE.to_string())
    }
}
