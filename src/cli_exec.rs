use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use status_widget::config::WidgetConfig;
use status_widget::engine::LoadPhase;
use status_widget::model::ViewItem;
use status_widget::remote::WidgetClient;
use status_widget::session::{Applied, Session};

use crate::Commands;

pub(super) fn handle_command(cfg: &WidgetConfig, command: Commands) -> Result<()> {
    let wait = Duration::from_secs(cfg.timeout_secs);
    let mut session = open_session(cfg, wait)?;

    match command {
        Commands::List { json } => {
            let items = session.engine().snapshot();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&*items).context("serialize items json")?
                );
            } else if items.is_empty() {
                println!("(no items)");
            } else {
                for item in items.iter() {
                    println!("{}", fmt_item(item));
                }
            }
        }
        Commands::Next { item, json } => {
            session
                .cycle_status(&item)
                .with_context(|| format!("unknown item {}", item))?;
            let item = finish_update(&mut session, &item, wait)?;
            print_item(&item, json)?;
        }
        Commands::Set { item, status, json } => {
            // Unresolved input goes out verbatim so the store reports it.
            let status_id = session
                .engine()
                .catalog()
                .resolve(&status)
                .map(|o| o.id.clone())
                .unwrap_or(status);
            session
                .set_status(&item, &status_id)
                .with_context(|| format!("unknown item {}", item))?;
            let item = finish_update(&mut session, &item, wait)?;
            print_item(&item, json)?;
        }
    }

    session.shutdown();
    Ok(())
}

fn open_session(cfg: &WidgetConfig, wait: Duration) -> Result<Session> {
    let client = WidgetClient::from_config(cfg)?;
    let mut session = Session::new(Arc::new(client), &cfg.widget_id);
    session.start_load();
    session.pump_until_idle(wait);

    match session.engine().phase() {
        LoadPhase::Ready => Ok(session),
        LoadPhase::Error { message } => {
            anyhow::bail!("load widget {}: {}", cfg.widget_id, message)
        }
        LoadPhase::Loading => anyhow::bail!("load widget {}: timed out", cfg.widget_id),
    }
}

fn finish_update(session: &mut Session, item_id: &str, wait: Duration) -> Result<ViewItem> {
    for applied in session.pump_until_idle(wait) {
        match applied {
            Applied::UpdateFailed { item_id: id, message } if id == item_id => {
                anyhow::bail!("{}: {}", id, message);
            }
            Applied::Updated { item_id: id, .. } if id == item_id => {
                return session
                    .engine()
                    .item(item_id)
                    .cloned()
                    .with_context(|| format!("item {} vanished", item_id));
            }
            _ => {}
        }
    }
    anyhow::bail!("{}: no response from server", item_id)
}

fn print_item(item: &ViewItem, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(item).context("serialize item json")?
        );
    } else {
        println!("{}", fmt_item(item));
    }
    Ok(())
}

fn fmt_item(item: &ViewItem) -> String {
    format!(
        "{}  {:<12}  {} {}",
        item.id,
        item.status.as_deref().unwrap_or("?"),
        if item.is_checked { "[x]" } else { "[ ]" },
        item.title
    )
}
