use log::info;
use pantry_scan::completion::CompletionClient;
use pantry_scan::config::AppConfig;
use pantry_scan::ocr::GoogleVisionReader;
use pantry_scan::pipelines::{ExtractionPipeline, RecommendationPipeline};
use pantry_scan::server::{self, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load()?;

    let reader = Arc::new(GoogleVisionReader::with_base_url(
        config.ocr.resolve_api_key()?,
        config.ocr.base_url.clone(),
    ));
    let extraction = ExtractionPipeline::new(
        reader,
        CompletionClient::new(&config.completion)?,
        config.ocr.locale.clone(),
    );
    let recommendation = RecommendationPipeline::new(
        CompletionClient::new(&config.completion)?,
        config.recommendation.recipe_count,
    );

    let state = AppState {
        extraction: Arc::new(extraction),
        recommendation: Arc::new(recommendation),
    };

    let listener = TcpListener::bind(&config.server.bind).await?;
    info!("listening on {}", config.server.bind);
    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
