use actix_web::{HttpResponse, get, web};
use inspector_service::{HistoryRecord, Inspector, StatusRecord, UrlAnalytics};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

macros_utils::routes! {
    route url_history,
    route analytics,
    route latest_statuses,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// Comma separated URL list
    pub urls: String,
}

#[derive(Debug, Serialize)]
struct HistoryBody {
    history: Vec<HistoryRecord>,
}

#[derive(Debug, Serialize)]
struct AnalyticsBody {
    analytics: Vec<UrlAnalytics>,
}

#[derive(Debug, Serialize)]
struct ResultsBody {
    results: Vec<StatusRecord>,
}

/// Segments are trimmed; empty ones are skipped.
fn split_urls(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|url| !url.is_empty()).map(str::to_owned).collect()
}

#[get("/url_history")]
pub async fn url_history(
    inspector: web::Data<Inspector>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let history = inspector.history(&query.url).await?;
    let history = history.into_iter().map(HistoryRecord::from).collect();

    Ok(HttpResponse::Ok().json(HistoryBody { history }))
}

#[get("/analytics")]
pub async fn analytics(
    inspector: web::Data<Inspector>,
    query: web::Query<AnalyticsQuery>,
) -> Result<HttpResponse, AppError> {
    let summaries = inspector.analytics(&split_urls(&query.urls)).await?;

    Ok(HttpResponse::Ok().json(AnalyticsBody { analytics: summaries }))
}

#[get("/latest_statuses")]
pub async fn latest_statuses(inspector: web::Data<Inspector>) -> Result<HttpResponse, AppError> {
    let latest = inspector.latest_statuses().await?;
    let results = latest.into_iter().map(StatusRecord::from).collect();

    Ok(HttpResponse::Ok().json(ResultsBody { results }))
}
