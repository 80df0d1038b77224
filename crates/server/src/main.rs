use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use server_api::ApiContext;
use storage::Storage;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod error;
mod routes;
mod views;

use app_state::AppState;
use config::{load_settings, prepare_database_url, Settings};
use views::Views;

#[derive(Debug, Clone, Copy)]
struct RequestLimits {
    timeout: Duration,
    max_body_bytes: usize,
}

impl From<&Settings> for RequestLimits {
    fn from(settings: &Settings) -> Self {
        Self {
            timeout: settings.request_timeout(),
            max_body_bytes: settings.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings()?;
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open article database; verify the parent directory is writable"
        );
        error
    })?;
    info!(%database_url, "connected to article database");

    let state = AppState {
        api: ApiContext::new(storage),
        views: Views::new()?,
    };
    let app = build_router(Arc::new(state), RequestLimits::from(&settings));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

fn build_router(state: Arc<AppState>, limits: RequestLimits) -> Router {
    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/", get(routes::list_articles))
        .route(
            "/article/:id",
            get(routes::show_article).delete(routes::delete_article),
        )
        .route(
            "/articles/add",
            get(routes::new_article_form).post(routes::create_article),
        )
        .route("/article/edit/:id", get(routes::edit_article_form))
        .route("/articles/edit/:id", post(routes::update_article))
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
