use crate::{error::AppError, AppState};
use analytics::{
    AnalyticsEngine, AnalyticsError, CleanReport, CorrelationMatrix, DailyClosingPrices,
    MonthlyStatistics, MonthlyTrades, PricePrediction, RsiPoint, SummaryRow, TrendPoint,
};
use axum::{
    extract::{Query, State},
    Json,
};
use core_types::Column;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct RsiParams {
    pub window: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CorrelationParams {
    /// Comma-separated column keys or labels, e.g. `volume,number_of_trades`.
    pub columns: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub records: usize,
}

/// Runs an analytics query on the blocking pool against the current snapshot.
async fn run_query<T, F>(state: &AppState, query: F) -> Result<T, AppError>
where
    F: FnOnce(AnalyticsEngine) -> Result<T, AnalyticsError> + Send + 'static,
    T: Send + 'static,
{
    let engine = state.engine();
    let result = tokio::task::spawn_blocking(move || query(engine)).await?;
    Ok(result?)
}

fn parse_columns(raw: &str) -> Result<Vec<Column>, AppError> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.parse::<Column>()
                .map_err(|_| AppError::BadRequest(format!("unknown column '{}'", part.trim())))
        })
        .collect()
}

/// # GET /data-summary
pub async fn data_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SummaryRow>>, AppError> {
    let rows = run_query(&state, |engine| Ok(engine.summarize())).await?;
    Ok(Json(rows))
}

/// # POST /clean-data
/// Reports how many rows would survive cleaning; nothing is modified.
pub async fn clean_data(State(state): State<Arc<AppState>>) -> Result<Json<CleanReport>, AppError> {
    let report = run_query(&state, |engine| Ok(engine.clean())).await?;
    Ok(Json(report))
}

/// # GET /monthly-statistics
pub async fn monthly_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyStatistics>>, AppError> {
    let months = run_query(&state, |engine| engine.monthly_statistics()).await?;
    Ok(Json(months))
}

/// # GET /price-trends
pub async fn price_trends(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrendPoint>>, AppError> {
    let trends = run_query(&state, |engine| engine.price_trends()).await?;
    Ok(Json(trends))
}

/// # GET /trade-analysis
pub async fn trade_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyTrades>>, AppError> {
    let trades = run_query(&state, |engine| engine.trade_analysis()).await?;
    Ok(Json(trades))
}

/// # GET /correlation-analysis?columns=a,b
/// Without `columns`, the configured default pair is used.
pub async fn correlation_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CorrelationParams>,
) -> Result<Json<CorrelationMatrix>, AppError> {
    let columns = match params.columns.as_deref() {
        Some(raw) => parse_columns(raw)?,
        None => state.analytics.correlation_columns.clone(),
    };
    let matrix = run_query(&state, move |engine| engine.correlate(Some(columns.as_slice()))).await?;
    Ok(Json(matrix))
}

/// # GET /price-prediction
pub async fn price_prediction(State(state): State<Arc<AppState>>) -> Json<PricePrediction> {
    Json(state.engine().price_prediction())
}

/// # GET /closing-price-over-time
pub async fn closing_price_over_time(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DailyClosingPrices>, AppError> {
    let daily = run_query(&state, |engine| engine.daily_closing_price()).await?;
    Ok(Json(daily))
}

/// # GET /calculate-rsi?window=n
/// Without `window`, the configured default is used.
pub async fn calculate_rsi(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RsiParams>,
) -> Result<Json<Vec<RsiPoint>>, AppError> {
    let window = params.window.unwrap_or(state.analytics.rsi_window);
    let points = run_query(&state, move |engine| engine.rsi(Some(window))).await?;
    Ok(Json(points))
}

/// # POST /reload-data
/// Re-reads the source file and swaps it in. Requests already running keep their snapshot.
pub async fn reload_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, AppError> {
    let reload_state = state.clone();
    let dataset = tokio::task::spawn_blocking(move || reload_state.store.reload()).await??;
    Ok(Json(ReloadResponse {
        records: dataset.len(),
    }))
}
