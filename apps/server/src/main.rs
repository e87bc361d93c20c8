#![warn(clippy::all, clippy::pedantic)]

use std::env::var;
use std::net::SocketAddr;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use inspector_service::{Config, Inspector};

mod error;
mod routes;

use error::AppError;
use logger::init_tracing;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_config(var("INSPECTOR_CONFIG").ok())?;
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;

    let inspector = web::Data::new(Inspector::open(&config).await?);
    let outcome = run_server(addr, inspector.clone()).await;
    inspector.shutdown();
    outcome
}

async fn run_server(addr: SocketAddr, inspector: web::Data<Inspector>) -> Result<(), AppError> {
    tracing::info!("Listening on {addr}");

    HttpServer::new(move || {
        App::new().wrap(routes::cors()).app_data(inspector.clone()).configure(routes::routes)
    })
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
