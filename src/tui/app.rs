use std::sync::mpsc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::session::{Applied, Session};

/// Status picker opened by right click (or `s`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct StatusMenu {
    pub(super) item_id: String,
    pub(super) selected: usize,
}

// Left button held on a row; becomes a drag once it crosses another row.
#[derive(Clone, Debug)]
struct Press {
    item_id: String,
    dragging: bool,
}

pub struct App {
    pub(super) session: Session,
    pub(super) selected: usize,
    pub(super) menu: Option<StatusMenu>,
    pub(super) notice: Option<String>,
    // Set by the renderer: where the rows were drawn and the first visible row.
    pub(super) list_area: Rect,
    pub(super) list_offset: usize,
    press: Option<Press>,
    updates: mpsc::Receiver<u64>,
    pub quit: bool,
}

impl App {
    pub fn new(mut session: Session) -> Self {
        let updates = session.subscribe();
        Self {
            session,
            selected: 0,
            menu: None,
            notice: None,
            list_area: Rect::default(),
            list_offset: 0,
            press: None,
            updates,
            quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn start(&mut self) {
        self.session.start_load();
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }

    /// Apply finished requests and pick up engine changes.
    pub fn tick(&mut self) {
        for applied in self.session.pump() {
            match applied {
                Applied::UpdateFailed { item_id, message } => {
                    self.notice = Some(format!("{}: {}", item_id, message));
                }
                Applied::LoadFailed { message } => {
                    self.notice = Some(format!("load failed: {}", message));
                }
                Applied::Loaded { .. } | Applied::Updated { .. } => {
                    self.notice = None;
                }
                Applied::Stale { .. } => {}
            }
        }
        if self.updates.try_iter().count() > 0 {
            self.clamp_selection();
        }
    }

    fn row_id(&self, idx: usize) -> Option<String> {
        self.session
            .engine()
            .snapshot()
            .get(idx)
            .map(|i| i.id.clone())
    }

    fn position_of(&self, item_id: &str) -> Option<usize> {
        self.session
            .engine()
            .snapshot()
            .iter()
            .position(|i| i.id == item_id)
    }

    fn clamp_selection(&mut self) {
        let len = self.session.engine().snapshot().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.menu.is_some() {
            self.handle_menu_key(key);
            return;
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('r') => {
                self.notice = None;
                self.session.retry();
            }
            KeyCode::Up if shift => self.move_selected(-1),
            KeyCode::Down if shift => self.move_selected(1),
            KeyCode::Char('K') => self.move_selected(-1),
            KeyCode::Char('J') => self.move_selected(1),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected += 1;
                self.clamp_selection();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.row_id(self.selected) {
                    self.session.cycle_status(&id);
                }
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.row_id(self.selected) {
                    self.open_menu(&id);
                }
            }
            _ => {}
        }
    }

    fn move_selected(&mut self, delta: isize) {
        let Some(id) = self.row_id(self.selected) else {
            return;
        };
        let Some(target_idx) = self.selected.checked_add_signed(delta) else {
            return;
        };
        let Some(target) = self.row_id(target_idx) else {
            return;
        };
        if self.session.move_item(&id, &target) {
            self.selected = target_idx;
        }
    }

    fn open_menu(&mut self, item_id: &str) {
        let engine = self.session.engine();
        if engine.catalog().is_empty() {
            return;
        }
        let selected = engine
            .item(item_id)
            .and_then(|i| engine.catalog().position(&i.status_id))
            .unwrap_or(0);
        self.menu = Some(StatusMenu {
            item_id: item_id.to_string(),
            selected,
        });
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let count = self.session.engine().catalog().len();
        let Some(menu) = self.menu.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.menu = None,
            KeyCode::Up | KeyCode::Char('k') => menu.selected = menu.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                menu.selected = (menu.selected + 1).min(count.saturating_sub(1));
            }
            KeyCode::Enter => self.choose_menu(None),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let idx = c as usize - '1' as usize;
                if idx < count {
                    self.choose_menu(Some(idx));
                }
            }
            _ => {}
        }
    }

    fn choose_menu(&mut self, idx: Option<usize>) {
        let Some(menu) = self.menu.take() else {
            return;
        };
        let idx = idx.unwrap_or(menu.selected);
        let status_id = self
            .session
            .engine()
            .catalog()
            .options()
            .get(idx)
            .map(|o| o.id.clone());
        if let Some(status_id) = status_id {
            self.session.set_status(&menu.item_id, &status_id);
        }
    }

    /// Row index under a terminal cell, if any.
    pub(super) fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.list_area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        let idx = (row - area.y) as usize + self.list_offset;
        (idx < self.session.engine().snapshot().len()).then_some(idx)
    }

    pub fn handle_mouse(&mut self, ev: MouseEvent) {
        if self.menu.is_some() {
            if let MouseEventKind::Down(_) = ev.kind {
                self.menu = None;
            }
            return;
        }

        let hit = self.row_at(ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(idx) = hit {
                    self.selected = idx;
                }
                self.press = hit.and_then(|idx| self.row_id(idx)).map(|item_id| Press {
                    item_id,
                    dragging: false,
                });
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (Some(idx), Some(press)) = (hit, self.press.clone()) else {
                    return;
                };
                let Some(target) = self.row_id(idx) else {
                    return;
                };
                if target == press.item_id {
                    return;
                }
                if !press.dragging {
                    if !self.session.drag_start(&press.item_id) {
                        return;
                    }
                    self.press = Some(Press {
                        dragging: true,
                        ..press.clone()
                    });
                }
                self.session.drag_over(&target);
                if let Some(pos) = self.position_of(&press.item_id) {
                    self.selected = pos;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(press) = self.press.take() else {
                    return;
                };
                if press.dragging {
                    self.session.drag_end();
                } else if hit.and_then(|idx| self.row_id(idx)).as_deref()
                    == Some(press.item_id.as_str())
                {
                    self.session.cycle_status(&press.item_id);
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some(idx) = hit {
                    self.selected = idx;
                    if let Some(id) = self.row_id(idx) {
                        self.open_menu(&id);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui/app_tests.rs"]
mod tests;
