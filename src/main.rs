use std::env;
use std::sync::Arc;

use skillet::config::Config;
use skillet::{api, db, AppState};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Console logging filtered by RUST_LOG, defaulting to info.
fn init_telemetry() {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi().to_pretty_json().unwrap();
        println!("{}", spec);
        return;
    }

    // .env values must land before the logger and config read them
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    init_telemetry();

    if dotenv_loaded {
        tracing::debug!("loaded environment from .env");
    }

    let config = Arc::new(Config::from_env());

    let pool = db::create_pool(&config.db_path);

    if let Err(err) = std::fs::create_dir_all(&config.upload_dir) {
        tracing::warn!(
            error = %err,
            dir = %config.upload_dir.display(),
            "could not create upload directory"
        );
    }

    let state = AppState {
        pool,
        config: config.clone(),
    };

    let app = skillet::app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());
    tracing::info!(
        "OpenAPI spec available at http://localhost:{}/api-docs/openapi.json",
        config.port
    );

    axum::serve(listener, app).await.unwrap();
}
