pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod models;
pub mod provider;
pub mod query;
pub mod router;

// Re-export commonly used types
pub use analyzer::{FavoritesAnalyzer, GenreProfile};
pub use catalog::{RECOMMENDATION_COUNT, RecommendationCatalog};
pub use config::{PLACEHOLDER_API_KEY, ProviderConfig, ProviderMode};
pub use engine::RecommendationEngine;
pub use error::{DiscoveryError, Result};
pub use models::{
    ChatMessage, MovieSummary, ParsedQuery, ProviderKind, Recommendation, Role, Routed,
};
pub use provider::{ChatTransport, CloudProvider, CompletionRequest, LocalProvider, Provider};
pub use query::QueryParser;
pub use router::AIProviderRouter;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a fixed outcome and counts calls.
    struct ScriptedTransport {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn down() -> Arc<Self> {
            Arc::new(Self {
                reply: Err("connection reset by peer".to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn complete(&self, _request: CompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(DiscoveryError::Transport)
        }
    }

    fn cloud_router(transport: Arc<ScriptedTransport>) -> AIProviderRouter {
        AIProviderRouter::new(vec![
            Arc::new(CloudProvider::new(transport)),
            Arc::new(LocalProvider::default()),
        ])
    }

    fn favorites() -> Vec<MovieSummary> {
        vec![
            MovieSummary::new(603, "The Matrix", vec![28, 878]).with_release_date("1999-03-30"),
            MovieSummary::new(27205, "Inception", vec![28, 878, 12]).with_release_date("2010-07-15"),
        ]
    }

    fn assert_five_distinct(titles: impl Iterator<Item = String>) {
        let titles: Vec<String> = titles.collect();
        assert_eq!(titles.len(), RECOMMENDATION_COUNT);
        let unique: HashSet<String> = titles.iter().map(|t| t.to_lowercase()).collect();
        assert_eq!(unique.len(), RECOMMENDATION_COUNT, "{titles:?}");
    }

    #[tokio::test]
    async fn cloud_transport_failure_falls_back_to_local() {
        let transport = ScriptedTransport::down();
        let router = cloud_router(transport.clone());

        let routed = router.recommend(&favorites(), Some("more twists")).await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert_eq!(routed.provider, ProviderKind::Local);
        assert_five_distinct(routed.value.into_iter().map(|r| r.title));
    }

    #[tokio::test]
    async fn cloud_unparseable_payload_falls_back_to_local() {
        let router = cloud_router(ScriptedTransport::ok("Sorry, I can't help with that."));
        let routed = router.recommend(&favorites(), None).await.unwrap();
        assert_eq!(routed.provider, ProviderKind::Local);
        assert_five_distinct(routed.value.into_iter().map(|r| r.title));
    }

    #[tokio::test]
    async fn cloud_success_is_used_and_capped() {
        let payload = r#"[
            {"title": "Dark City", "reason": "Noir sci-fi mystery."},
            {"title": "Primer", "reason": "Time travel puzzle."},
            {"title": "Looper", "reason": "Action time travel."},
            {"title": "Minority Report", "reason": "Future crime thriller."},
            {"title": "Source Code", "reason": "Looping thriller."},
            {"title": "Edge of Tomorrow", "reason": "Action time loop."}
        ]"#;
        let router = cloud_router(ScriptedTransport::ok(payload));
        let routed = router.recommend(&favorites(), None).await.unwrap();

        assert_eq!(routed.provider, ProviderKind::Cloud);
        assert_eq!(routed.value[0].title, "Dark City");
        assert_five_distinct(routed.value.into_iter().map(|r| r.title));
    }

    #[tokio::test]
    async fn empty_favorites_never_reach_the_network() {
        let transport = ScriptedTransport::ok("[]");
        let router = cloud_router(transport.clone());
        let err = router.recommend(&[], None).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Input(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn cloud_query_failure_matches_local_parser() {
        let router = cloud_router(ScriptedTransport::down());
        let query = "scary movies from the 90s";
        let routed = router.parse_query(query).await.unwrap();

        assert_eq!(routed.provider, ProviderKind::Local);
        assert_eq!(routed.value, QueryParser::new().parse(query));
    }

    #[tokio::test]
    async fn cloud_connection_test_returns_literal_reply() {
        let router = cloud_router(ScriptedTransport::ok(" Connection successful \n"));
        let routed = router.test_connection().await.unwrap();
        assert_eq!(routed.provider, ProviderKind::Cloud);
        assert_eq!(routed.value, "Connection successful");
    }

    #[tokio::test]
    async fn cloud_summary_and_chat() {
        let router = cloud_router(ScriptedTransport::ok("A dazzling heist inside dreams."));
        let movie = MovieSummary::new(27205, "Inception", vec![28, 878])
            .with_overview("A thief who steals corporate secrets through dream-sharing technology.");

        let summary = router.summarize(&movie).await.unwrap();
        assert_eq!(summary.value, "A dazzling heist inside dreams.");

        let history = vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")];
        let reply = router.chat("Something like Inception?", &history).await.unwrap();
        assert_eq!(reply.provider, ProviderKind::Cloud);
    }

    #[tokio::test]
    async fn cloud_summary_failure_is_surfaced() {
        let router = cloud_router(ScriptedTransport::down());
        let movie = MovieSummary::new(27205, "Inception", vec![28]);
        let err = router.summarize(&movie).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Transport(_)));
    }

    #[tokio::test]
    async fn placeholder_key_disables_router() {
        let config = ProviderConfig::cloud(PLACEHOLDER_API_KEY);
        assert!(!config.is_ai_enabled());

        let router = AIProviderRouter::from_config(&config).unwrap();
        let err = router.recommend(&favorites(), None).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration(_)));
        assert_eq!(err.user_message(), "No AI service configured");
    }

    #[cfg(feature = "inference")]
    #[tokio::test]
    async fn local_mode_with_unreachable_inference_falls_back() {
        let config = ProviderConfig {
            inference_url: "http://127.0.0.1:9/models/unavailable".to_string(),
            request_timeout: std::time::Duration::from_millis(500),
            ..ProviderConfig::local()
        };
        let router = AIProviderRouter::from_config(&config).unwrap();
        assert_eq!(
            router.provider_kinds(),
            vec![ProviderKind::Inference, ProviderKind::Local]
        );

        let routed = router.recommend(&favorites(), None).await.unwrap();
        assert_eq!(routed.provider, ProviderKind::Local);
        assert_five_distinct(routed.value.into_iter().map(|r| r.title));

        let connection = router.test_connection().await.unwrap();
        assert_eq!(connection.provider, ProviderKind::Local);
    }

    #[test]
    fn parser_is_total_over_odd_inputs() {
        let parser = QueryParser::new();
        for input in [
            "",
            "   ",
            "THE",
            "1999",
            "80s",
            "🎬🍿",
            "in the from movies films",
            "a very long query about magic wizards in space from 2001 that feel good",
        ] {
            let parsed = parser.parse(input);
            assert!(!parsed.search_terms.is_empty(), "{input:?}");
        }
    }

    #[tokio::test]
    async fn cloud_outage_is_reported_by_connection_test() {
        let router = cloud_router(ScriptedTransport::down());
        let err = router.test_connection().await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Connectivity(_)));
    }
}
