use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use status_widget::config::WidgetConfig;
use status_widget::{logging, tui};

mod cli_exec;

#[derive(Parser)]
#[command(name = "widget")]
#[command(about = "Synchronized to-do status widget", long_about = None)]
struct Cli {
    /// Client config file (JSON); falls back to $WIDGET_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the server base URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Override the widget id
    #[arg(long, global = true)]
    widget: Option<String>,

    /// Write logs to this file (the TUI owns the terminal)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print items in display order
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Advance an item to its next status
    Next {
        item: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Set an item's status by id or name
    Set {
        item: String,
        status: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = WidgetConfig::load(cli.config.as_deref())?.with_overrides(cli.url, cli.widget)?;

    match cli.command {
        None => {
            if let Some(path) = cli.log_file.as_deref() {
                logging::init_file(path, "info")?;
            }
            tui::run(&cfg)
        }
        Some(command) => {
            match cli.log_file.as_deref() {
                Some(path) => logging::init_file(path, "info")?,
                None => logging::init_stderr("warn"),
            }
            cli_exec::handle_command(&cfg, command)
        }
    }
}
