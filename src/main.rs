use axum::{
    routing::{get, post},
    Router,
};
use comment_sentiment::{
    analysis::Analyzer,
    api,
    config::Settings,
    filter::WhatlangDetector,
    ml::LexiconScorer,
    youtube::YouTubeClient,
};
use dotenv::dotenv;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::index,
        api::analyze,
        api::health
    ),
    components(
        schemas(
            api::AnalyzeForm,
            api::HealthResponse,
            comment_sentiment::analysis::AnalysisResult,
            comment_sentiment::ml::Sentiment,
            comment_sentiment::error::ErrorResponse
        )
    ),
    tags(
        (name = "analysis", description = "Comment Sentiment Analysis"),
        (name = "system", description = "Service Health")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    let client = YouTubeClient::new(&settings)?;
    let analyzer = Analyzer::new(
        Arc::new(client),
        Arc::new(WhatlangDetector),
        Arc::new(LexiconScorer::new()),
    );

    let static_dir = settings.static_dir.clone();
    let bind_addr = settings.bind_addr.clone();
    let state = Arc::new(api::AppState { analyzer, settings });

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::index))
        .route("/analyze", post(api::analyze))
        .route("/health", get(api::health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
