mod api;
mod assets;
mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use assets::Assets;
use config::{CACHE_1DAY, CACHE_IMMUTABLE};

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

#[derive(Clone)]
struct IndexPage(Arc<PathBuf>);

/// Build the full application router.
///
/// Boundary documents and other public files are served from the site root
/// (`/Odisha.json`), the built frontend from `/dist` and `/assets`.
fn build_app(assets: Arc<Assets>, assets_dir: &Path, dist_dir: &Path) -> Router {
    let api = Router::new()
        .route("/api/mapdata", get(api::map_data))
        .route("/api/render.svg", get(api::render_svg))
        .with_state(assets);

    let pages = Router::new()
        .route("/", get(serve_index))
        .route("/choropleth", get(serve_index))
        .with_state(IndexPage(Arc::new(dist_dir.join("index.html"))));

    let static_files = Router::new()
        .nest("/dist", cached_static_router(dist_dir, CACHE_IMMUTABLE))
        .nest(
            "/assets",
            cached_static_router(&dist_dir.join("assets"), CACHE_IMMUTABLE),
        )
        .merge(cached_static_router(assets_dir, CACHE_1DAY));

    api.merge(pages)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let assets_dir = config::assets_dir();
    let dist_dir = config::dist_dir();
    let mapdata_file = config::mapdata_file();
    let loaded_assets = Arc::new(Assets::load(
        &assets_dir,
        &config::boundary_file(),
        mapdata_file.as_deref(),
    ));

    let app = build_app(loaded_assets, &assets_dir, &dist_dir);

    let port = config::port();
    let addr = format!("{}:{}", config::bind_addr(), port);
    tracing::info!(
        assets = %assets_dir.display(),
        dist = %dist_dir.display(),
        "Server running at http://localhost:{port}"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}

async fn serve_index(State(IndexPage(index)): State<IndexPage>) -> Html<String> {
    // Serve the built frontend if present, otherwise a placeholder
    match tokio::fs::read_to_string(index.as_path()).await {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Odisha Live Power Outage Dashboard</title></head>
<body>
<h1>Odisha Live Power Outage Dashboard</h1>
<p>Frontend not built yet. Map values are available at <a href="/api/mapdata">/api/mapdata</a>
and a rendered map at <a href="/api/render.svg">/api/render.svg</a>.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}
