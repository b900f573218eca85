use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{DiscoveryError, Result};
use crate::models::{MovieSummary, ProviderKind, Recommendation};
use crate::provider::Provider;

/// Longest generated line still accepted as a movie title.
const MAX_TITLE_WORDS: usize = 10;

#[derive(Debug, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_length: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

/// Free hosted text-generation endpoint (Hugging Face inference API).
///
/// Only recommendations are supported; every other operation falls through
/// to the next tier.
#[derive(Debug, Clone)]
pub struct InferenceProvider {
    client: reqwest::Client,
    url: String,
}

impl InferenceProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

fn prompt_for(favorites: &[MovieSummary]) -> String {
    let titles = favorites
        .iter()
        .map(|m| m.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Recommend 3 movies similar to: {titles}")
}

/// Leading list marker such as `1.`, `2)`, `-` or `•`.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+").expect("Invalid regex"));

/// Conversational openers that never start a title.
const CHATTER_OPENERS: &[&str] = &[
    "i", "i'm", "i'd", "i'll", "i've", "you", "you're", "we", "we're", "they", "they're",
    "he's", "she's", "my", "sorry",
];

/// Pulls candidate titles out of free-form generated text.
///
/// Only a real list marker is stripped, so titles starting with digits
/// survive. Unmarked lines are also split on commas. Sentences, favorites
/// and repeats are skipped.
fn extract_titles(generated: &str, prompt: &str, favorites: &[MovieSummary]) -> Vec<String> {
    let body = generated.strip_prefix(prompt).unwrap_or(generated);
    let mut seen: HashSet<String> = favorites.iter().map(|m| m.title.to_lowercase()).collect();

    body.lines()
        .flat_map(|line| match LIST_MARKER.find(line) {
            Some(marker) => vec![&line[marker.end()..]],
            None => line.split(',').collect::<Vec<_>>(),
        })
        .map(|piece| {
            piece
                .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”') || c.is_whitespace())
                .to_string()
        })
        .filter(|title| looks_like_title(title))
        .filter(|title| seen.insert(title.to_lowercase()))
        .collect()
}

fn looks_like_title(candidate: &str) -> bool {
    let Some(first) = candidate.chars().next() else {
        return false;
    };
    if first.is_lowercase() || candidate.ends_with(['.', '?', '!']) {
        return false;
    }
    let opener = candidate
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    !CHATTER_OPENERS.contains(&opener.as_str())
        && candidate.split_whitespace().count() <= MAX_TITLE_WORDS
}

#[async_trait]
impl Provider for InferenceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Inference
    }

    async fn recommend(
        &self,
        favorites: &[MovieSummary],
        _preferences: Option<&str>,
    ) -> Result<Vec<Recommendation>> {
        let prompt = prompt_for(favorites);
        let body = InferenceRequest {
            inputs: prompt.clone(),
            parameters: GenerationParameters {
                max_length: 100,
                temperature: 0.7,
            },
        };

        info!(url = %self.url, "Requesting free inference recommendations");
        let response = self.client.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Inference API returned an error status");
            return Err(DiscoveryError::Transport(format!(
                "Inference API returned {status}"
            )));
        }

        let generations: Vec<Generation> = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Parse(format!("Malformed inference response: {e}")))?;
        let generated = generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| DiscoveryError::Parse("Inference response had no generations".into()))?;

        let titles = extract_titles(&generated, &prompt, favorites);
        if titles.is_empty() {
            return Err(DiscoveryError::Parse(format!(
                "No movie titles in generated text: {generated}"
            )));
        }

        let inspiration = favorites
            .first()
            .map(|m| m.title.as_str())
            .unwrap_or("your favorites");
        Ok(titles
            .into_iter()
            .map(|title| {
                Recommendation::new(
                    title,
                    format!("Suggested by AI text generation for fans of {inspiration}."),
                )
            })
            .collect())
    }
}
