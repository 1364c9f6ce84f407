//! Basic usage example for jsondump-actix
//!
//! Starts a small server with two capture stages: the default stdout dump on
//! every route, and a channel-backed consumer logging through `tracing`.
//!
//! Run with:
//! ```bash
//! RUST_LOG=info cargo run --example basic_usage
//! ```

use actix_web::{web, App, HttpResponse, HttpServer};
use jsondump_actix::prelude::*;
use tracing_subscriber::EnvFilter;

async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello jsondump!")
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "example-app"
    }))
}

async fn echo(body: String) -> HttpResponse {
    HttpResponse::Ok().body(body)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Records from the API scope go to a background consumer
    let (emitter, mut records) = ChannelEmitter::new();
    actix_web::rt::spawn(async move {
        while let Some(record) = records.recv().await {
            tracing::info!(
                path = %record.request.path,
                status = record.response.status,
                "api call captured"
            );
        }
    });

    let api_options = CaptureOptions::new()
        .capture_request_headers(false)
        .capture_response_headers(false)
        .emitter(emitter);

    println!("Starting example server on http://0.0.0.0:8080");
    println!("\nTry these endpoints:");
    println!("  GET  http://localhost:8080/");
    println!("  GET  http://localhost:8080/api/health");
    println!("  POST http://localhost:8080/api/echo");

    HttpServer::new(move || {
        App::new()
            .service(
                web::scope("/api")
                    .wrap(CaptureMiddleware::with_options(api_options.clone()))
                    .route("/health", web::get().to(health))
                    .route("/echo", web::post().to(echo)),
            )
            .service(
                web::scope("")
                    .wrap(CaptureMiddleware::new())
                    .route("/", web::get().to(index)),
            )
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
