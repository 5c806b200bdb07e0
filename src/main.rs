use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use bucket_gallery::application::{
    AlbumAggregator, DeleteMediaUseCase, ListAlbumsUseCase, ListMediaUseCase, MediaItemProjector,
    MediaRecordSource,
};
use bucket_gallery::config::Config;
use bucket_gallery::infrastructure::SqliteMediaIndex;
use bucket_gallery::presentation::{app_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!(?config, "Starting media album service");

    // Initialize Infrastructure
    let index = Arc::new(SqliteMediaIndex::open(&config.index_path)?);

    // Initialize Use Cases
    let aggregator = AlbumAggregator::new(
        MediaRecordSource::new(index),
        MediaItemProjector::new(config.timestamp_unit),
    );

    let state = AppState {
        albums_use_case: Arc::new(ListAlbumsUseCase::new(aggregator.clone())),
        list_use_case: Arc::new(ListMediaUseCase::new(aggregator)),
        delete_use_case: Arc::new(DeleteMediaUseCase::new()),
        default_page_size: config.page_size,
    };

    let app = Router::new()
        .nest("/api", app_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;

    info!("Server running on http://0.0.0.0:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
