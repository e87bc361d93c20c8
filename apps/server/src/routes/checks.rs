use actix_web::{HttpResponse, delete, post, web};
use inspector_service::{Inspector, StatusRecord};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

macros_utils::routes! {
    route check_urls,
    route delete_all_urls,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ResultsBody {
    results: Vec<StatusRecord>,
}

#[derive(Debug, Serialize)]
struct SuccessBody {
    success: bool,
}

/// Probe a batch of URLs now and return one status per URL, in request order.
#[post("/check_urls")]
pub async fn check_urls(
    inspector: web::Data<Inspector>,
    request: web::Json<CheckRequest>,
) -> Result<HttpResponse, AppError> {
    let observations = inspector.check_urls(&request.urls).await?;
    let results = observations.into_iter().map(StatusRecord::from).collect();

    Ok(HttpResponse::Ok().json(ResultsBody { results }))
}

/// Unconditionally purge the observation log.
#[delete("/delete_all_urls")]
pub async fn delete_all_urls(inspector: web::Data<Inspector>) -> Result<HttpResponse, AppError> {
    inspector.purge_all().await?;

    Ok(HttpResponse::Ok().json(SuccessBody { success: true }))
}
