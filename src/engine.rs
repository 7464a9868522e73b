//! View-model ordering engine.
//!
//! Holds the local ordered item sequence and derives the display order:
//! a stable sort by status rank until the first manual drag, after which the
//! order is frozen for the rest of the session. Readers get immutable
//! snapshots; every mutation builds a new sequence and swaps it in.

use std::sync::Arc;
use std::sync::mpsc;

use crate::catalog::StatusCatalog;
use crate::error::{WidgetError, WidgetResult};
use crate::model::{StatusUpdate, ViewItem, WidgetSnapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Error { message: String },
}

/// What the rendering surface should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    /// Load failed; distinct from an empty but valid list.
    NoData { message: String },
    Empty,
    Items(Arc<[ViewItem]>),
}

pub struct OrderingEngine {
    catalog: StatusCatalog,
    items: Arc<[ViewItem]>,
    manual_order_active: bool,
    dragging: Option<String>,
    phase: LoadPhase,
    revision: u64,
    subscribers: Vec<mpsc::Sender<u64>>,
}

impl Default for OrderingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderingEngine {
    pub fn new() -> Self {
        Self {
            catalog: StatusCatalog::default(),
            items: Arc::from(Vec::new()),
            manual_order_active: false,
            dragging: None,
            phase: LoadPhase::Loading,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &StatusCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn manual_order_active(&self) -> bool {
        self.manual_order_active
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current ordered items. The returned snapshot never changes.
    pub fn snapshot(&self) -> Arc<[ViewItem]> {
        Arc::clone(&self.items)
    }

    pub fn item(&self, item_id: &str) -> Option<&ViewItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn display(&self) -> DisplayState {
        match &self.phase {
            LoadPhase::Loading => DisplayState::Loading,
            LoadPhase::Error { message } => DisplayState::NoData {
                message: message.clone(),
            },
            LoadPhase::Ready if self.items.is_empty() => DisplayState::Empty,
            LoadPhase::Ready => DisplayState::Items(self.snapshot()),
        }
    }

    /// Receives the new revision after every change.
    pub fn subscribe(&mut self) -> mpsc::Receiver<u64> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn begin_load(&mut self) {
        self.phase = LoadPhase::Loading;
        self.dragging = None;
        self.notify();
    }

    /// Replace the whole collection from a `query_all` result.
    pub fn load_snapshot(&mut self, snapshot: WidgetSnapshot) -> WidgetResult<()> {
        let catalog = match StatusCatalog::load(snapshot.status_options) {
            Ok(c) => c,
            Err(err) => {
                self.fail_load(&err);
                return Err(err);
            }
        };

        let mut items: Vec<ViewItem> = snapshot
            .items
            .into_iter()
            .map(|it| {
                let mut v = ViewItem::from_snapshot(it);
                v.status_color = catalog.color_of(&v.status_id);
                if v.status.is_none() {
                    v.status = catalog.name_of(&v.status_id).map(str::to_string);
                }
                v
            })
            .collect();

        self.catalog = catalog;
        self.manual_order_active = false;
        self.dragging = None;
        auto_sort(&mut items, &self.catalog);
        self.phase = LoadPhase::Ready;
        tracing::debug!(items = items.len(), "snapshot loaded");
        self.publish(items);
        Ok(())
    }

    pub fn fail_load(&mut self, err: &WidgetError) {
        tracing::warn!(error = %err, "load failed");
        self.phase = LoadPhase::Error {
            message: err.to_string(),
        };
        self.dragging = None;
        self.publish(Vec::new());
    }

    /// Patch one item with the store's answer. Returns false if the id is not in the list.
    pub fn apply_status_update(&mut self, update: &StatusUpdate) -> bool {
        let Some(idx) = self.items.iter().position(|i| i.id == update.id) else {
            tracing::debug!(item = %update.id, "status update for unknown item ignored");
            return false;
        };

        let mut items = self.items.to_vec();
        let item = &mut items[idx];
        item.status_id = update.status_id.clone();
        item.status = update
            .status
            .clone()
            .or_else(|| self.catalog.name_of(&update.status_id).map(str::to_string));
        item.last_edited_time = update.last_edited_time.clone();
        item.status_color = self.catalog.color_of(&item.status_id);

        // Status changes never move items once manual order is active.
        if !self.manual_order_active {
            auto_sort(&mut items, &self.catalog);
        }
        self.publish(items);
        true
    }

    /// Record the dragged item. Unknown ids are ignored.
    pub fn drag_start(&mut self, item_id: &str) -> bool {
        if self.item(item_id).is_none() {
            return false;
        }
        self.dragging = Some(item_id.to_string());
        true
    }

    /// Move the dragged item to the hovered item's position.
    pub fn drag_over(&mut self, target_id: &str) -> bool {
        let Some(dragged) = self.dragging.as_deref() else {
            return false;
        };
        if dragged == target_id {
            return false;
        }
        let from = self.items.iter().position(|i| i.id == dragged);
        let to = self.items.iter().position(|i| i.id == target_id);
        let (Some(from), Some(to)) = (from, to) else {
            return false;
        };

        let mut items = self.items.to_vec();
        let moved = items.remove(from);
        items.insert(to, moved);
        reindex(&mut items);

        if !self.manual_order_active {
            tracing::info!("manual order active; automatic sort disabled");
        }
        self.manual_order_active = true;
        self.publish(items);
        true
    }

    pub fn drag_end(&mut self) {
        self.dragging = None;
    }

    /// Drag `item_id` straight onto `target_id`.
    pub fn move_item(&mut self, item_id: &str, target_id: &str) -> bool {
        let moved = self.drag_start(item_id) && self.drag_over(target_id);
        self.drag_end();
        moved
    }

    fn publish(&mut self, items: Vec<ViewItem>) {
        self.items = Arc::from(items);
        self.notify();
    }

    fn notify(&mut self) {
        self.revision += 1;
        let rev = self.revision;
        self.subscribers.retain(|tx| tx.send(rev).is_ok());
    }
}

/// Stable sort by status rank, so items of equal rank keep their prior relative order.
pub fn auto_sort(items: &mut [ViewItem], catalog: &StatusCatalog) {
    items.sort_by_key(|i| catalog.rank_of(&i.status_id));
    reindex(items);
}

fn reindex(items: &mut [ViewItem]) {
    for (pos, item) in items.iter_mut().enumerate() {
        item.ui_order = pos;
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
