use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::sync::RwLock;

use status_widget::error::WidgetError;
use status_widget::store::ItemStore;

#[path = "widget_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "widget_server/seed.rs"]
mod seed;
use self::seed::*;
#[path = "widget_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "widget_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "widget_server/runtime.rs"]
mod runtime;

#[derive(Clone)]
struct AppState {
    // Writes hold the lock across read-modify-write, so each transition is atomic.
    store: Arc<RwLock<ItemStore>>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
