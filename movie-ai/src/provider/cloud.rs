use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::analyzer::{GenreProfile, TOP_GENRE_LIMIT};
use crate::error::{DiscoveryError, Result};
use crate::lexicon;
use crate::models::{ChatMessage, MovieSummary, ParsedQuery, ProviderKind, Recommendation};
use crate::provider::transport::{ChatTransport, CompletionRequest};
use crate::provider::{Provider, extract_json};

const RECOMMENDER_SYSTEM_PROMPT: &str = "You are a movie recommendation expert. Provide accurate, popular movie suggestions in the requested JSON format.";

const SEARCH_SYSTEM_PROMPT: &str =
    "You are a movie search assistant. Extract search parameters from natural language queries.";

const CRITIC_SYSTEM_PROMPT: &str = "You are a movie critic who writes engaging, concise movie summaries that capture the essence of films.";

const CHATBOT_SYSTEM_PROMPT: &str = r#"You are a knowledgeable and enthusiastic movie expert chatbot. You help users discover new movies, discuss films, answer movie trivia, and provide personalized recommendations.

Guidelines:
- Be conversational and engaging
- Provide specific movie recommendations when asked
- Share interesting movie facts and trivia
- Help users discover movies based on their mood, preferences, or criteria
- Keep responses concise but informative
- Always be positive and helpful about movies"#;

const CONNECTION_PROMPT: &str = "Say 'Connection successful' if you can read this.";

/// Cloud language-model tier.
///
/// Prompts the model for machine-readable JSON and converts anything it
/// cannot read into [`DiscoveryError::Parse`].
#[derive(Clone)]
pub struct CloudProvider {
    transport: Arc<dyn ChatTransport>,
}

impl CloudProvider {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }
}

fn recommendation_prompt(favorites: &[MovieSummary], preferences: Option<&str>) -> String {
    let titles = favorites
        .iter()
        .map(MovieSummary::display_title)
        .collect::<Vec<_>>()
        .join(", ");
    let preferences = preferences
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("User preferences: {p}\n"))
        .unwrap_or_default();
    let genres = GenreProfile::from_movies(favorites)
        .top(TOP_GENRE_LIMIT)
        .into_iter()
        .filter_map(lexicon::genre_name)
        .collect::<Vec<_>>();
    let genres = if genres.is_empty() {
        String::new()
    } else {
        format!("Favorite genres: {}\n", genres.join(", "))
    };

    format!(
        r#"Based on these favorite movies: {titles}
{genres}{preferences}
Recommend 5 similar movies that the user might enjoy. For each movie, provide:
1. Title
2. Brief reason why it matches their taste (1-2 sentences)

Format as JSON array:
[
  {{
    "title": "Movie Title",
    "reason": "Brief explanation"
  }}
]"#
    )
}

fn search_prompt(query: &str) -> String {
    format!(
        r#"Convert this natural language movie search into specific movie search terms and filters:
"{query}"

Extract:
1. Main search keywords (movie titles, actors, directors)
2. Genre preferences
3. Time period/year range
4. Mood/theme

Return as JSON:
{{
  "searchTerms": "main keywords for a movie catalog search",
  "genre": "genre if mentioned",
  "yearRange": "year range if mentioned",
  "mood": "mood/theme description"
}}"#
    )
}

fn summary_prompt(movie: &MovieSummary) -> String {
    let overview = movie.overview.as_deref().unwrap_or("Not available");
    format!(
        r#"Generate a compelling 2-3 sentence summary for the movie "{title}".

Original overview: {overview}

Make it engaging and highlight what makes this movie special. Focus on themes, style, and why someone should watch it."#,
        title = movie.display_title()
    )
}

fn parse_recommendations(raw: &str) -> Result<Vec<Recommendation>> {
    let json = extract_json(raw, '[', ']')
        .ok_or_else(|| DiscoveryError::Parse(format!("No JSON array in response: {raw}")))?;
    Ok(serde_json::from_str(json)?)
}

fn parse_search(raw: &str) -> Result<ParsedQuery> {
    let json = extract_json(raw, '{', '}')
        .ok_or_else(|| DiscoveryError::Parse(format!("No JSON object in response: {raw}")))?;
    let parsed: ParsedQuery = serde_json::from_str(json)?;
    Ok(parsed.normalized())
}

#[async_trait]
impl Provider for CloudProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Cloud
    }

    async fn recommend(
        &self,
        favorites: &[MovieSummary],
        preferences: Option<&str>,
    ) -> Result<Vec<Recommendation>> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(RECOMMENDER_SYSTEM_PROMPT),
            ChatMessage::user(recommendation_prompt(favorites, preferences)),
        ])
        .max_tokens(800)
        .temperature(0.7);

        let raw = self.transport.complete(request).await?;
        info!(response = %raw, "Cloud recommendation response");
        parse_recommendations(&raw)
    }

    async fn parse_query(&self, query: &str) -> Result<ParsedQuery> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(SEARCH_SYSTEM_PROMPT),
            ChatMessage::user(search_prompt(query)),
        ])
        .max_tokens(300)
        .temperature(0.3);

        let raw = self.transport.complete(request).await?;
        parse_search(&raw)
    }

    async fn test_connection(&self) -> Result<String> {
        let request = CompletionRequest::new(vec![ChatMessage::user(CONNECTION_PROMPT)]).max_tokens(10);
        match self.transport.complete(request).await {
            Ok(reply) => Ok(reply.trim().to_string()),
            Err(e) => {
                error!("Cloud connection test failed: {}", e);
                Err(DiscoveryError::Connectivity(e.to_string()))
            }
        }
    }

    async fn summarize(&self, movie: &MovieSummary) -> Result<String> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(CRITIC_SYSTEM_PROMPT),
            ChatMessage::user(summary_prompt(movie)),
        ])
        .max_tokens(200)
        .temperature(0.7);

        Ok(self.transport.complete(request).await?.trim().to_string())
    }

    async fn chat(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(CHATBOT_SYSTEM_PROMPT));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(message));

        let request = CompletionRequest::new(messages)
            .max_tokens(400)
            .temperature(0.8);
        Ok(self.transport.complete(request).await?.trim().to_string())
    }
}
