use std::net::SocketAddr;
use std::path::PathBuf;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

/// Development server for the world map page.
#[derive(Debug, Parser)]
#[command(name = "site_server", version)]
struct Args {
    /// Directory served at `/`.
    #[arg(long, env = "SITE_ROOT", default_value = "crates/apps/viewer_web/assets")]
    root: PathBuf,
    #[arg(long, env = "SITE_ADDR", default_value = "127.0.0.1:8300")]
    addr: SocketAddr,
    /// Boundary dataset mirrored at `/data/world.geojson`.
    #[arg(long, env = "DATASET_UPSTREAM", default_value = DEFAULT_DATASET_URL)]
    dataset_upstream: String,
}

#[derive(Clone)]
struct AppState {
    root: PathBuf,
    dataset_upstream: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    root: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if !args.root.is_dir() {
        error!("site root {} is not a directory", args.root.display());
    }
    let state = AppState {
        root: args.root,
        dataset_upstream: args.dataset_upstream,
        http: reqwest::Client::new(),
    };

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    info!("site server listening on http://{}", args.addr);
    info!("serving files from {}", state.root.display());
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE]);
    let files = ServeDir::new(&state.root);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/data/world.geojson", get(dataset))
        .with_state(state)
        .fallback_service(files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        root: state.root.display().to_string(),
    })
}

async fn dataset(State(state): State<AppState>) -> Response {
    match state.http.get(&state.dataset_upstream).send().await {
        Ok(resp) => map_proxy_response(resp).await,
        Err(err) => {
            error!("dataset GET failed: {err}");
            (StatusCode::BAD_GATEWAY, "dataset unavailable").into_response()
        }
    }
}

async fn map_proxy_response(resp: reqwest::Response) -> Response {
    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = resp
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/geo+json")
        .to_string();

    match resp.bytes().await {
        Ok(bytes) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_str(&content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static("application/json")),
            );
            (status, headers, Body::from(bytes)).into_response()
        }
        Err(err) => {
            error!("dataset response read failed: {err}");
            (StatusCode::BAD_GATEWAY, "dataset unavailable").into_response()
        }
    }
}
