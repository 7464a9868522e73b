use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use super::*;

#[derive(Parser)]
#[command(name = "widget-server")]
#[command(about = "In-memory item store for the status widget", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5055")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// JSON seed file with widgets, status options and items (defaults to demo data)
    #[arg(long)]
    seed: Option<PathBuf>,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    status_widget::logging::init_stderr("info");

    let store = load_store(args.seed.as_deref()).context("load item store")?;
    tracing::info!(widgets = ?store.widget_ids(), "item store ready");

    let state = Arc::new(AppState {
        store: Arc::new(RwLock::new(store)),
    });
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(addr = %local_addr, "widget-server listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
