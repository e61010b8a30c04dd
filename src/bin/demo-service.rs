//! A probe-able demo service.
//!
//! `/health` reports uptime; `/work` answers with random latency and the
//! occasional 4xx/5xx so every monitor condition can be observed.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use clap::Parser;
use rand::Rng;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "demo-service")]
#[command(about = "Demo target exposing /health and /work", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
}

#[derive(Clone)]
struct AppState {
    started: Instant,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_sec: u64,
    version: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        uptime_sec: state.started.elapsed().as_secs(),
        version: "1.0.0",
    })
}

async fn work() -> impl IntoResponse {
    let roll: u64 = rand::thread_rng().gen_range(0..100);
    match roll {
        1 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        2 => StatusCode::BAD_REQUEST.into_response(),
        _ => {
            tokio::time::sleep(Duration::from_millis(roll)).await;
            "done!".into_response()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo_service=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let state = AppState {
        started: Instant::now(),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/work", get(work))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Demo service listening");
    axum::serve(listener, app).await?;
    Ok(())
}
