use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use fabula_api::{app, bootstrap, config::Config, middleware::logging, state::AppState};
use fabula_assistants::{AssistantsApi, AssistantsClient};

#[derive(OpenApi)]
#[openapi(
    paths(
        fabula_api::routes::health::liveness,
        fabula_api::routes::stories::upload_story,
        fabula_api::routes::questions::ask_question,
    ),
    components(schemas(
        fabula_api::routes::health::LivenessResponse,
        fabula_api::routes::stories::UploadResponse,
        fabula_api::routes::stories::FileCountsResponse,
        fabula_api::routes::questions::AskRequest,
        fabula_api::routes::questions::AskResponse,
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting story assistant API");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize the provider client
    let client = AssistantsClient::new(config.openai_api_key.clone())
        .map_err(|e| anyhow::anyhow!("Failed to create assistants client: {}", e))?
        .with_poll_config(config.assistant.poll_config());
    let assistants: Arc<dyn AssistantsApi> = Arc::new(client);

    // Provision the vector store, assistant, and conversation thread before
    // accepting any traffic
    tracing::info!("Provisioning assistant resources");
    let handles = bootstrap::provision(assistants.as_ref(), &config.assistant)
        .await
        .map_err(|e| anyhow::anyhow!("Bootstrap failed, refusing to serve traffic: {}", e))?;

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), assistants, handles));

    // Build router
    let router = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, router).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .merge(app(state.clone()))
        .layer(axum::middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300)))
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
