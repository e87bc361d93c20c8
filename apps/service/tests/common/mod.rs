//! Shared fixtures: throwaway stores and local HTTP stubs.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use inspector_service::Inspector;
use inspector_service::config::Config;
use inspector_service::database::{Database, DatabaseImpl, initialize_database};
use inspector_service::monitoring::{Checker, HttpChecker};
use inspector_service::pool::open_pool;
use tempfile::{TempDir, tempdir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `status` with a tiny body to every connection; returns the base URL.
pub async fn spawn_stub(status: u16) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status} {}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
                    reason(status)
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}/")
}

/// Answer every request with `302 Found` pointing at `location`.
pub async fn spawn_redirect_stub(location: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub address");
    let location = location.to_string();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let response = format!(
                "HTTP/1.1 302 Found\r\nlocation: {location}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
            );
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}/")
}

/// Accept connections and never answer.
pub async fn spawn_silent_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                drop(socket);
            });
        }
    });

    format!("http://{addr}/")
}

/// A loopback URL nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}/")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Migrated store on a temporary file
pub async fn create_test_database() -> Result<(Arc<dyn Database>, TempDir)> {
    logger::try_init_tracing();
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let pool = open_pool(&db_path.to_string_lossy(), 8).await?;

    let conn = pool.get().await?;
    initialize_database(&conn).await?;
    drop(conn);

    Ok((Arc::new(DatabaseImpl::new_from_pool(pool)), temp_dir))
}

/// Inspector over a temporary store and a real HTTP checker
pub async fn create_test_inspector(timeout: Duration) -> Result<(Inspector, TempDir)> {
    let (database, temp_dir) = create_test_database().await?;
    let checker: Arc<dyn Checker> = Arc::new(HttpChecker::new(timeout)?);
    Ok((Inspector::new(database, checker), temp_dir))
}

/// Config pointing at a fresh database file inside `dir`
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.database.path = dir.path().join("open.db").to_string_lossy().into_owned();
    config.probe.timeout_seconds = 2;
    config
}
