use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::error::WatchlistError;
use crate::logging;
use crate::page::render_page;
use crate::publisher::SnapshotStore;
use crate::quote::QuoteSnapshot;
use crate::shutdown::{self, ShutdownSignal};
use crate::sink::Container;
use crate::watchlist::Watchlist;

/// Everything the HTTP handlers read or mutate.
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotStore,
    pub container: Container,
    pub watchlist: Watchlist,
    pub logo_dir: PathBuf,
    /// Browser reload period baked into the served page.
    pub page_reload_secs: Option<u64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/stock_data.json", get(snapshot))
        .route("/tickers", get(list_tickers))
        .route("/tickers/:symbol", post(add_ticker).delete(remove_ticker))
        .route("/logos/:file", get(logo))
        .with_state(state)
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind ticker server at {addr}"))
}

pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: watch::Receiver<ShutdownSignal>,
) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("listener has no local address")?;
    logging::info(
        "server.bind",
        "Ticker server listening",
        json!({ "addr": addr.to_string() }),
    );

    let shutdown_signal = async move {
        shutdown::requested(&mut shutdown).await;
    };

    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("ticker server terminated with error")?;

    logging::info_simple("server.stop", "Ticker server stopped");
    Ok(())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.container.content(), state.page_reload_secs))
}

async fn snapshot(State(state): State<AppState>) -> Json<QuoteSnapshot> {
    Json(state.snapshots.latest())
}

async fn list_tickers(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.watchlist.symbols())
}

async fn add_ticker(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, WatchlistError> {
    let symbol = state.watchlist.add(&symbol)?;
    logging::info(
        "watchlist.add",
        "Ticker added to watchlist",
        json!({ "symbol": symbol }),
    );
    Ok((StatusCode::CREATED, Json(json!({ "symbol": symbol }))))
}

async fn remove_ticker(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<StatusCode, WatchlistError> {
    let symbol = state.watchlist.remove(&symbol)?;
    logging::info(
        "watchlist.remove",
        "Ticker removed from watchlist",
        json!({ "symbol": symbol }),
    );
    Ok(StatusCode::NO_CONTENT)
}

async fn logo(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    if file.contains(&['/', '\\'][..]) || file.starts_with('.') {
        return StatusCode::NOT_FOUND.into_response();
    }
    match tokio::fs::read(state.logo_dir.join(&file)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

impl IntoResponse for WatchlistError {
    fn into_response(self) -> Response {
        let status = match self {
            WatchlistError::Empty => StatusCode::BAD_REQUEST,
            WatchlistError::AlreadyTracked(_) => StatusCode::CONFLICT,
            WatchlistError::NotTracked(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
