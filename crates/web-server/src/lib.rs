use analytics::AnalyticsEngine;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use configuration::error::ConfigError;
use configuration::{AnalyticsSettings, ServerSettings, Settings};
use dataset::DatasetStore;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub store: DatasetStore,
    pub analytics: AnalyticsSettings,
}

impl AppState {
    pub fn new(store: DatasetStore, analytics: AnalyticsSettings) -> Self {
        Self { store, analytics }
    }

    /// A query facade over the snapshot that is current right now.
    pub fn engine(&self) -> AnalyticsEngine {
        AnalyticsEngine::new(self.store.snapshot())
    }
}

/// Builds the CORS policy from the configured origins.
///
/// Credentials are only allowed with an explicit origin list; a `"*"` entry
/// opens the API to any origin without credentials.
fn cors_layer(server: &ServerSettings) -> Result<CorsLayer, ConfigError> {
    if server.allows_any_origin() {
        return Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods(Any)
            .allow_headers(AllowHeaders::any()));
    }

    let origins = server
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim()).map_err(|_| {
                ConfigError::ValidationError(format!("invalid CORS origin '{origin}'"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Defines the application routes on top of the shared state.
pub fn build_router(state: Arc<AppState>, server: &ServerSettings) -> Result<Router, ConfigError> {
    let cors = cors_layer(server)?;

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/data-summary", get(handlers::data_summary))
        .route("/clean-data", post(handlers::clean_data))
        .route("/monthly-statistics", get(handlers::monthly_statistics))
        .route("/price-trends", get(handlers::price_trends))
        .route("/trade-analysis", get(handlers::trade_analysis))
        .route("/correlation-analysis", get(handlers::correlation_analysis))
        .route("/price-prediction", get(handlers::price_prediction))
        .route("/closing-price-over-time", get(handlers::closing_price_over_time))
        .route("/calculate-rsi", get(handlers::calculate_rsi))
        .route("/reload-data", post(handlers::reload_data))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Loads the dataset, then configures and runs the web server until Ctrl-C.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    // Note: Tracing is initialized by the binary before this is called.
    let addr = settings.server.address()?;

    let path = settings.data.path.clone();
    let store = tokio::task::spawn_blocking(move || DatasetStore::open(path)).await??;

    let app_state = Arc::new(AppState::new(store, settings.analytics.clone()));
    let app = build_router(app_state, &settings.server)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
