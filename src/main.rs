use std::sync::Arc;

use tower_http::cors::CorsLayer;

use blogsmith::api::batch_routes;
use blogsmith::batch::{BatchDeps, JobRegistry};
use blogsmith::config::AppConfig;
use blogsmith::llm::AnthropicGenerator;
use blogsmith::publish::PayloadPublisher;
use blogsmith::store::{DocumentStore, JsonFileStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export ANTHROPIC_API_KEY=sk-ant-...");
        std::process::exit(1);
    });

    eprintln!("📝 Blogsmith v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Store: {}", config.store_path.display());
    eprintln!("   Batch API: http://0.0.0.0:{}/api/content/generate-batch", config.port);

    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(config.store_path.clone()));
    let generator = Arc::new(AnthropicGenerator::new(
        &config.anthropic_api_key,
        &config.model,
    )?);
    let publisher = Arc::new(PayloadPublisher::new());

    let deps = BatchDeps::new(store, generator, publisher);
    let registry = JobRegistry::new(deps, config.batch.clone());

    let app = batch_routes(registry).layer(CorsLayer::permissive());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
