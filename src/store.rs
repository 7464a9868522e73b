//! Authoritative in-memory item store. Applies status transitions and stamps edit times.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::catalog::StatusCatalog;
use crate::error::{WidgetError, WidgetResult};
use crate::model::{ItemSnapshot, StatusColor, StatusOption, StatusUpdate, WidgetSnapshot};

pub const DEMO_WIDGET_ID: &str = "w_1";

pub fn fmt_ts(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_else(|_| "<time>".to_string())
}

#[derive(Clone, Debug)]
struct StoredItem {
    id: String,
    title: String,
    is_checked: bool,
    status_id: String,
    last_edited: OffsetDateTime,
}

#[derive(Clone, Debug)]
struct WidgetRecord {
    catalog: StatusCatalog,
    // Insertion order is the order `query_all` reports.
    items: Vec<StoredItem>,
}

impl WidgetRecord {
    fn item_mut(&mut self, item_id: &str) -> WidgetResult<&mut StoredItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| WidgetError::NotFound("item not found".to_string()))
    }
}

/// Seed file format for `widget-server --seed`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedFile {
    pub widgets: Vec<SeedWidget>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedWidget {
    pub id: String,
    pub status_options: Vec<StatusOption>,
    pub items: Vec<SeedItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedItem {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub is_checked: bool,

    #[serde(default)]
    pub status_id: String,

    #[serde(default)]
    pub last_edited_time: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ItemStore {
    widgets: HashMap<String, WidgetRecord>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget `w_1` with the three-step To-do / In progress / Done cycle.
    pub fn demo() -> Self {
        let seed = SeedFile {
            widgets: vec![SeedWidget {
                id: DEMO_WIDGET_ID.to_string(),
                status_options: vec![
                    StatusOption::new("opt_a", "To-do", StatusColor::Blue),
                    StatusOption::new("opt_b", "In progress", StatusColor::Yellow),
                    StatusOption::new("opt_c", "Done", StatusColor::Green),
                ],
                items: vec![
                    demo_item("page1", "Complete the Galle project", "opt_a", false),
                    demo_item("page2", "Go to the gym on Tuesday", "opt_c", true),
                    demo_item("page3", "Draft the quarterly review", "opt_a", false),
                    demo_item("page4", "Book flights", "opt_c", true),
                    demo_item("page5", "Party TIME", "opt_c", false),
                ],
            }],
        };
        // Demo data is static and valid.
        Self::from_seed(seed).unwrap_or_default()
    }

    pub fn from_seed(seed: SeedFile) -> WidgetResult<Self> {
        let mut store = Self::new();
        for w in seed.widgets {
            store.insert_widget(w)?;
        }
        Ok(store)
    }

    pub fn insert_widget(&mut self, seed: SeedWidget) -> WidgetResult<()> {
        if seed.id.trim().is_empty() {
            return Err(WidgetError::Validation("widget id is empty".to_string()));
        }
        if self.widgets.contains_key(&seed.id) {
            return Err(WidgetError::Validation(format!(
                "duplicate widget id {}",
                seed.id
            )));
        }
        let catalog = StatusCatalog::load(seed.status_options)?;

        let now = OffsetDateTime::now_utc();
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(seed.items.len());
        for it in seed.items {
            if it.id.trim().is_empty() {
                return Err(WidgetError::Validation(format!(
                    "widget {} has an item with an empty id",
                    seed.id
                )));
            }
            if !seen.insert(it.id.clone()) {
                return Err(WidgetError::Validation(format!(
                    "widget {} has duplicate item id {}",
                    seed.id, it.id
                )));
            }
            if !it.status_id.is_empty() && !catalog.contains(&it.status_id) {
                tracing::warn!(
                    widget = %seed.id,
                    item = %it.id,
                    status_id = %it.status_id,
                    "seed item references an unknown status"
                );
            }
            let last_edited = match it.last_edited_time.as_deref() {
                Some(s) => OffsetDateTime::parse(s, &Rfc3339).map_err(|e| {
                    WidgetError::Validation(format!(
                        "item {} lastEditedTime {:?}: {}",
                        it.id, s, e
                    ))
                })?,
                None => now,
            };
            items.push(StoredItem {
                id: it.id,
                title: it.title,
                is_checked: it.is_checked,
                status_id: it.status_id,
                last_edited,
            });
        }

        self.widgets
            .insert(seed.id, WidgetRecord { catalog, items });
        Ok(())
    }

    pub fn widget_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.widgets.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn widget(&self, widget_id: &str) -> WidgetResult<&WidgetRecord> {
        self.widgets
            .get(widget_id)
            .ok_or_else(|| WidgetError::NotFound("widget not found".to_string()))
    }

    fn widget_mut(&mut self, widget_id: &str) -> WidgetResult<&mut WidgetRecord> {
        self.widgets
            .get_mut(widget_id)
            .ok_or_else(|| WidgetError::NotFound("widget not found".to_string()))
    }

    pub fn query_all(&self, widget_id: &str) -> WidgetResult<WidgetSnapshot> {
        let w = self.widget(widget_id)?;
        let items = w
            .items
            .iter()
            .map(|i| ItemSnapshot {
                id: i.id.clone(),
                title: i.title.clone(),
                is_checked: i.is_checked,
                status_id: i.status_id.clone(),
                status: w.catalog.name_of(&i.status_id).map(str::to_string),
                last_edited_time: fmt_ts(i.last_edited),
            })
            .collect();
        Ok(WidgetSnapshot {
            items,
            status_options: w.catalog.options().to_vec(),
        })
    }

    /// Cycle to the next status. Not idempotent: two calls advance twice.
    pub fn advance_status(&mut self, widget_id: &str, item_id: &str) -> WidgetResult<StatusUpdate> {
        let w = self.widget_mut(widget_id)?;
        let current = w.item_mut(item_id)?.status_id.clone();
        let next = w
            .catalog
            .next(&current)
            .cloned()
            .ok_or_else(|| WidgetError::InvalidStatus("widget has no status options".to_string()))?;
        let item = w.item_mut(item_id)?;
        Ok(apply_status(item, next))
    }

    pub fn set_status(
        &mut self,
        widget_id: &str,
        item_id: &str,
        status_id: &str,
    ) -> WidgetResult<StatusUpdate> {
        let w = self.widget_mut(widget_id)?;
        w.item_mut(item_id)?;
        let opt = w
            .catalog
            .get(status_id)
            .cloned()
            .ok_or_else(|| WidgetError::InvalidStatus("invalid statusId".to_string()))?;
        let item = w.item_mut(item_id)?;
        Ok(apply_status(item, opt))
    }
}

fn apply_status(item: &mut StoredItem, opt: StatusOption) -> StatusUpdate {
    item.status_id = opt.id;
    item.last_edited = stamp(item.last_edited);
    StatusUpdate {
        id: item.id.clone(),
        status_id: item.status_id.clone(),
        status: Some(opt.name),
        last_edited_time: fmt_ts(item.last_edited),
    }
}

// Never moves an item's edit time backwards, even if the wall clock does.
fn stamp(prev: OffsetDateTime) -> OffsetDateTime {
    OffsetDateTime::now_utc().max(prev)
}

fn demo_item(id: &str, title: &str, status_id: &str, is_checked: bool) -> SeedItem {
    SeedItem {
        id: id.to_string(),
        title: title.to_string(),
        is_checked,
        status_id: status_id.to_string(),
        last_edited_time: None,
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
