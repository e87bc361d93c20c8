use actix_web::{HttpResponse, Responder, get};

macros_utils::routes! {
    route health_route,
}

/// Liveness check for the inspector itself; it does not touch the store.
#[get("/")]
pub async fn health_route() -> impl Responder {
    HttpResponse::Ok()
}
