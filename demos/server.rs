//! Core-only server: auth, translations, and user administration with no
//! application modules. Run with `cargo run --example server`.

use manifold_api::{lifecycle, Manifest, Settings};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("manifold_api=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let app = lifecycle::start(settings, &Manifest::core()).await?;
    let router = app
        .router
        .clone()
        .layer(RequestBodyLimitLayer::new(1024 * 1024));

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    app.shutdown().await;
    Ok(())
}
