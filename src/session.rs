//! Serializes every mutation of the view-model onto one thread of control.
//!
//! Network calls run on worker threads and report back through a single
//! channel; [`Session::pump`] applies completions one at a time. Per item, the
//! last issued request wins: a success is dropped once a newer success for the
//! same item has been applied, and a failure is dropped once a newer request
//! has been issued. A newer request that fails never hides an older one the
//! store accepted.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::engine::{LoadPhase, OrderingEngine};
use crate::error::WidgetResult;
use crate::model::{StatusUpdate, WidgetSnapshot};
use crate::protocol::StatusBackend;

pub type Ticket = u64;

enum Completion {
    Load {
        generation: u64,
        result: WidgetResult<WidgetSnapshot>,
    },
    Status {
        item_id: String,
        ticket: Ticket,
        result: WidgetResult<StatusUpdate>,
    },
}

/// Outcome of applying one completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    Loaded { items: usize },
    LoadFailed { message: String },
    Updated { item_id: String, status_id: String },
    UpdateFailed { item_id: String, message: String },
    /// Superseded by a newer request for the same item (or a newer load).
    Stale { item_id: Option<String> },
}

/// Newest ticket issued per item.
#[derive(Debug, Default)]
pub struct RequestLedger {
    next: Ticket,
    latest: HashMap<String, Ticket>,
}

impl RequestLedger {
    pub fn issue(&mut self, item_id: &str) -> Ticket {
        self.next += 1;
        self.latest.insert(item_id.to_string(), self.next);
        self.next
    }

    pub fn is_current(&self, item_id: &str, ticket: Ticket) -> bool {
        self.latest.get(item_id) == Some(&ticket)
    }

    /// Tickets issued so far; the next ticket is strictly greater.
    pub fn high_water(&self) -> Ticket {
        self.next
    }
}

pub struct Session {
    backend: Arc<dyn StatusBackend>,
    widget_id: String,
    engine: OrderingEngine,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
    ledger: RequestLedger,
    load_generation: u64,
    // Ticket high-water mark when the current load was issued.
    load_mark: Ticket,
    applied: HashMap<String, (Ticket, StatusUpdate)>,
    in_flight: usize,
    last_error: Option<String>,
    closed: bool,
}

impl Session {
    pub fn new(backend: Arc<dyn StatusBackend>, widget_id: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            widget_id: widget_id.to_string(),
            engine: OrderingEngine::new(),
            tx,
            rx,
            ledger: RequestLedger::default(),
            load_generation: 0,
            load_mark: 0,
            applied: HashMap::new(),
            in_flight: 0,
            last_error: None,
            closed: false,
        }
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn engine(&self) -> &OrderingEngine {
        &self.engine
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<u64> {
        self.engine.subscribe()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fetch a full snapshot. Also used to retry after a failed load.
    pub fn start_load(&mut self) {
        if self.closed {
            return;
        }
        self.load_generation += 1;
        self.load_mark = self.ledger.high_water();
        self.engine.begin_load();

        let generation = self.load_generation;
        let backend = Arc::clone(&self.backend);
        let widget_id = self.widget_id.clone();
        tracing::info!(widget = %widget_id, generation, "loading items");
        self.spawn(move || Completion::Load {
            generation,
            result: backend.query_all(&widget_id),
        });
    }

    pub fn retry(&mut self) {
        self.start_load();
    }

    /// Cycle an item to its next status. Returns `None` if the item is not displayed.
    pub fn cycle_status(&mut self, item_id: &str) -> Option<Ticket> {
        if self.closed || self.engine.item(item_id).is_none() {
            return None;
        }
        let ticket = self.ledger.issue(item_id);
        let backend = Arc::clone(&self.backend);
        let widget_id = self.widget_id.clone();
        let item = item_id.to_string();
        tracing::debug!(item = %item, ticket, "advance status");
        self.spawn(move || {
            let result = backend.advance_status(&widget_id, &item);
            Completion::Status {
                item_id: item,
                ticket,
                result,
            }
        });
        Some(ticket)
    }

    pub fn set_status(&mut self, item_id: &str, status_id: &str) -> Option<Ticket> {
        if self.closed || self.engine.item(item_id).is_none() {
            return None;
        }
        let ticket = self.ledger.issue(item_id);
        let backend = Arc::clone(&self.backend);
        let widget_id = self.widget_id.clone();
        let item = item_id.to_string();
        let status_id = status_id.to_string();
        tracing::debug!(item = %item, status = %status_id, ticket, "set status");
        self.spawn(move || {
            let result = backend.set_status(&widget_id, &item, &status_id);
            Completion::Status {
                item_id: item,
                ticket,
                result,
            }
        });
        Some(ticket)
    }

    pub fn drag_start(&mut self, item_id: &str) -> bool {
        !self.closed && self.engine.drag_start(item_id)
    }

    pub fn drag_over(&mut self, target_id: &str) -> bool {
        !self.closed && self.engine.drag_over(target_id)
    }

    pub fn drag_end(&mut self) {
        self.engine.drag_end();
    }

    pub fn move_item(&mut self, item_id: &str, target_id: &str) -> bool {
        !self.closed && self.engine.move_item(item_id, target_id)
    }

    /// Apply every completion that has already arrived.
    pub fn pump(&mut self) -> Vec<Applied> {
        let mut out = Vec::new();
        while let Ok(c) = self.rx.try_recv() {
            if let Some(a) = self.apply(c) {
                out.push(a);
            }
        }
        out
    }

    /// Wait up to `timeout` for at least one completion, then drain the rest.
    pub fn pump_blocking(&mut self, timeout: Duration) -> Vec<Applied> {
        if self.closed || self.in_flight == 0 {
            return self.pump();
        }
        let mut out = Vec::new();
        if let Ok(c) = self.rx.recv_timeout(timeout)
            && let Some(a) = self.apply(c)
        {
            out.push(a);
        }
        out.extend(self.pump());
        out
    }

    /// Keep applying completions until nothing is in flight or `timeout` passes.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> Vec<Applied> {
        let deadline = Instant::now() + timeout;
        let mut out = Vec::new();
        while self.in_flight > 0 && !self.closed {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            out.extend(self.pump_blocking(left));
        }
        out
    }

    /// Tear the session down. Later completions are discarded without touching the engine.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.engine.drag_end();
        let dropped = self.rx.try_iter().count();
        self.in_flight = self.in_flight.saturating_sub(dropped);
        tracing::debug!(in_flight = self.in_flight, dropped, "session closed");
    }

    fn spawn(&mut self, job: impl FnOnce() -> Completion + Send + 'static) {
        self.in_flight += 1;
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            // The receiver is gone once the session is dropped.
            let _ = tx.send(job());
        });
    }

    fn apply(&mut self, completion: Completion) -> Option<Applied> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.closed {
            return None;
        }

        match completion {
            Completion::Load { generation, result } => {
                if generation != self.load_generation {
                    tracing::debug!(generation, "stale load dropped");
                    return Some(Applied::Stale { item_id: None });
                }
                match result.and_then(|snap| self.engine.load_snapshot(snap)) {
                    Ok(()) => {
                        self.reapply_newer_updates();
                        self.last_error = None;
                        Some(Applied::Loaded {
                            items: self.engine.snapshot().len(),
                        })
                    }
                    Err(err) => {
                        if !matches!(self.engine.phase(), LoadPhase::Error { .. }) {
                            self.engine.fail_load(&err);
                        }
                        self.last_error = Some(err.to_string());
                        Some(Applied::LoadFailed {
                            message: err.to_string(),
                        })
                    }
                }
            }

            Completion::Status {
                item_id,
                ticket,
                result,
            } => {
                // A success stands unless a newer success already landed; a
                // failure only surfaces if nothing newer was issued since.
                let superseded = match &result {
                    Ok(_) => self
                        .applied
                        .get(&item_id)
                        .is_some_and(|(applied, _)| *applied > ticket),
                    Err(_) => !self.ledger.is_current(&item_id, ticket),
                };
                if superseded {
                    tracing::debug!(item = %item_id, ticket, "stale status response dropped");
                    return Some(Applied::Stale {
                        item_id: Some(item_id),
                    });
                }
                match result {
                    Ok(update) if update.id == item_id => {
                        self.engine.apply_status_update(&update);
                        let status_id = update.status_id.clone();
                        self.applied.insert(item_id.clone(), (ticket, update));
                        tracing::info!(item = %item_id, status = %status_id, "status updated");
                        Some(Applied::Updated { item_id, status_id })
                    }
                    Ok(update) => {
                        let message = format!("response for {} answered {}", item_id, update.id);
                        tracing::warn!(%message, "mismatched status response");
                        self.last_error = Some(message.clone());
                        Some(Applied::UpdateFailed { item_id, message })
                    }
                    Err(err) => {
                        tracing::warn!(item = %item_id, error = %err, "status change failed");
                        let message = err.to_string();
                        self.last_error = Some(format!("{}: {}", item_id, message));
                        Some(Applied::UpdateFailed { item_id, message })
                    }
                }
            }
        }
    }

    // A snapshot may predate status changes issued after the load started; those win.
    fn reapply_newer_updates(&mut self) {
        let mark = self.load_mark;
        let mut newer: Vec<(Ticket, StatusUpdate)> = self
            .applied
            .values()
            .filter(|(t, _)| *t > mark)
            .cloned()
            .collect();
        newer.sort_by_key(|(t, _)| *t);
        for (_, update) in newer {
            self.engine.apply_status_update(&update);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
