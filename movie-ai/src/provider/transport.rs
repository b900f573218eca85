use async_trait::async_trait;

use crate::error::Result;
use crate::models::ChatMessage;

/// A single request to a chat-style language model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u64,
    pub temperature: f64,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            max_tokens: 256,
            temperature: 0.7,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Request/response channel to a cloud language model.
///
/// Implementations report every failure as [`DiscoveryError::Transport`](crate::DiscoveryError::Transport).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[cfg(feature = "rig")]
pub use rig_transport::RigTransport;

#[cfg(feature = "rig")]
mod rig_transport {
    use async_trait::async_trait;
    use rig::client::CompletionClient;
    use rig::completion::{Chat, Message};
    use rig::providers::openrouter;
    use tracing::debug;

    use super::{ChatTransport, CompletionRequest};
    use crate::error::{DiscoveryError, Result};
    use crate::models::Role;

    /// [`ChatTransport`] backed by rig's OpenRouter client.
    pub struct RigTransport {
        client: openrouter::Client,
        model: String,
    }

    impl RigTransport {
        pub fn new(api_key: &str, model: impl Into<String>) -> Self {
            Self {
                client: openrouter::Client::new(api_key),
                model: model.into(),
            }
        }
    }

    #[async_trait]
    impl ChatTransport for RigTransport {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            let mut preamble = Vec::new();
            let mut turns = Vec::new();
            for message in request.messages {
                match message.role {
                    Role::System => preamble.push(message.content),
                    Role::User | Role::Assistant => turns.push(message),
                }
            }

            let prompt = match turns.pop() {
                Some(last) if last.role == Role::User => last.content,
                _ => {
                    return Err(DiscoveryError::Transport(
                        "completion request must end with a user message".to_string(),
                    ));
                }
            };

            let history: Vec<Message> = turns
                .into_iter()
                .map(|turn| match turn.role {
                    Role::Assistant => Message::assistant(turn.content),
                    _ => Message::user(turn.content),
                })
                .collect();

            let mut builder = self
                .client
                .agent(&self.model)
                .max_tokens(request.max_tokens)
                .temperature(request.temperature);
            if !preamble.is_empty() {
                builder = builder.preamble(&preamble.join("\n\n"));
            }
            let agent = builder.build();

            debug!(model = %self.model, history = history.len(), "Sending chat completion");
            agent
                .chat(prompt.as_str(), history)
                .await
                .map_err(|e| DiscoveryError::Transport(format!("LLM chat failed: {}", e)))
        }
    }
}
