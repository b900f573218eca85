use axum::extract::State;
use axum::{
    Router,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use movie_ai::{
    AIProviderRouter, ChatMessage, DiscoveryError, MovieSummary, ParsedQuery, ProviderConfig,
    ProviderKind, ProviderMode, Recommendation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct RecommendationRequest {
    favorites: Vec<MovieSummary>,
    #[serde(default)]
    preferences: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    request_id: String,
    provider: ProviderKind,
    recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
struct ParseRequest {
    query: String,
}

#[derive(Debug, Serialize)]
struct ParseResponse {
    request_id: String,
    provider: ProviderKind,
    query: ParsedQuery,
}

#[derive(Debug, Serialize)]
struct ConnectionResponse {
    provider: ProviderKind,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SummaryRequest {
    movie: MovieSummary,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    provider: ProviderKind,
    summary: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    provider: ProviderKind,
    reply: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    ai_enabled: bool,
    mode: Option<&'static str>,
    providers: Vec<ProviderKind>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
struct AppState {
    router: Arc<AIProviderRouter>,
    mode: Option<ProviderMode>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: DiscoveryError) -> ApiError {
    let status = match &err {
        DiscoveryError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        DiscoveryError::Input(_) => StatusCode::BAD_REQUEST,
        DiscoveryError::Transport(_)
        | DiscoveryError::Parse(_)
        | DiscoveryError::Connectivity(_) => StatusCode::BAD_GATEWAY,
        DiscoveryError::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
        DiscoveryError::InsufficientCandidates { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    } else {
        warn!(error = %err, "Request rejected");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
        }),
    )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let mode = state.mode.map(|mode| match mode {
        ProviderMode::Local => "local",
        ProviderMode::Cloud => "cloud",
    });
    Json(StatusResponse {
        ai_enabled: state.router.is_ai_enabled(),
        mode,
        providers: state.router.provider_kinds(),
    })
}

async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    info!(
        request_id = %request_id,
        favorites = request.favorites.len(),
        "Received recommendation request"
    );

    let routed = state
        .router
        .recommend(&request.favorites, request.preferences.as_deref())
        .await
        .map_err(api_error)?;

    Ok(Json(RecommendationResponse {
        request_id,
        provider: routed.provider,
        recommendations: routed.value,
    }))
}

async fn parse_query(
    State(state): State<AppState>,
    Json(request): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    info!(request_id = %request_id, query = %request.query, "Received search request");

    let routed = state
        .router
        .parse_query(&request.query)
        .await
        .map_err(api_error)?;

    Ok(Json(ParseResponse {
        request_id,
        provider: routed.provider,
        query: routed.value,
    }))
}

async fn test_connection(
    State(state): State<AppState>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let routed = state.router.test_connection().await.map_err(api_error)?;
    Ok(Json(ConnectionResponse {
        provider: routed.provider,
        message: routed.value,
    }))
}

async fn summarize(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    info!(movie = %request.movie.title, "Received summary request");
    let routed = state
        .router
        .summarize(&request.movie)
        .await
        .map_err(api_error)?;
    Ok(Json(SummaryResponse {
        provider: routed.provider,
        summary: routed.value,
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(history = request.history.len(), "Received chat message");
    let routed = state
        .router
        .chat(&request.message, &request.history)
        .await
        .map_err(api_error)?;
    Ok(Json(ChatResponse {
        provider: routed.provider,
        reply: routed.value,
    }))
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status))
        .route("/recommend", post(recommend))
        .route("/search/parse", post(parse_query))
        .route("/connection", get(test_connection))
        .route("/summary", post(summarize))
        .route("/chat", post(chat))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Initialize tracing; `LOG_FORMAT=pretty` for development, JSON otherwise
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "recommendation_service=debug,movie_ai=debug,tower_http=debug".into()
    });

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting recommendation service");

    let config = ProviderConfig::from_env();
    if !config.is_ai_enabled() {
        warn!("No AI provider configured: set USE_LOCAL_AI=true or OPENROUTER_API_KEY");
    }

    let router = AIProviderRouter::from_config(&config)?;
    let state = AppState {
        router: Arc::new(router),
        mode: config.mode(),
    };

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server running on http://{}", bind_addr);

    info!("Available endpoints:");
    info!("  GET  /health        - Health check");
    info!("  GET  /status        - Provider configuration");
    info!("  POST /recommend     - Recommendations from favorite movies");
    info!("  POST /search/parse  - Natural language search to search parameters");
    info!("  GET  /connection    - Test the AI provider connection");
    info!("  POST /summary       - Movie summary (cloud only)");
    info!("  POST /chat          - Movie chatbot (cloud only)");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
