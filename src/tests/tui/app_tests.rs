use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use super::*;
use crate::protocol::LocalBackend;
use crate::store::{DEMO_WIDGET_ID, ItemStore};
use crate::tui::render;

fn demo_app() -> App {
    let backend = Arc::new(LocalBackend::new(ItemStore::demo()));
    let mut app = App::new(Session::new(backend, DEMO_WIDGET_ID));
    app.start();
    settle(&mut app);
    app
}

fn settle(app: &mut App) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        app.tick();
        if app.session.in_flight() == 0 || Instant::now() > deadline {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn draw(app: &mut App) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(60, 12)).expect("terminal");
    terminal.draw(|f| render::draw(f, app)).expect("draw");
    terminal
}

fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn ids(app: &App) -> Vec<String> {
    app.session
        .engine()
        .snapshot()
        .iter()
        .map(|i| i.id.clone())
        .collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

// 60x12: header rows 0-1, bordered list rows 2-9, so item rows start at y=3.
const FIRST_ROW: u16 = 3;

#[test]
fn renders_rows_in_status_order() {
    let mut app = demo_app();
    let terminal = draw(&mut app);
    let text = screen(&terminal);

    assert!(text.contains("by status"));
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[FIRST_ROW as usize].contains("Complete the Galle project"));
    assert!(lines[FIRST_ROW as usize + 1].contains("Draft the quarterly review"));
    assert!(lines[FIRST_ROW as usize + 2].contains("[x] Go to the gym"));
    assert_eq!(app.list_area.y, FIRST_ROW);
}

#[test]
fn enter_cycles_selected_item_and_resorts() {
    let mut app = demo_app();
    draw(&mut app);

    app.handle_key(key(KeyCode::Enter));
    settle(&mut app);

    let page1 = app.session.engine().item("page1").expect("page1");
    assert_eq!(page1.status_id, "opt_b");
    assert_eq!(ids(&app), vec!["page3", "page1", "page2", "page4", "page5"]);
}

#[test]
fn click_cycles_the_row_under_the_pointer() {
    let mut app = demo_app();
    draw(&mut app);

    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, FIRST_ROW + 1));
    app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5, FIRST_ROW + 1));
    settle(&mut app);

    assert_eq!(app.session.engine().item("page3").expect("page3").status_id, "opt_b");
    assert_eq!(app.session.engine().item("page1").expect("page1").status_id, "opt_a");
}

#[test]
fn pointer_drag_reorders_and_freezes_sorting() {
    let mut app = demo_app();
    draw(&mut app);

    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, FIRST_ROW + 2));
    app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 5, FIRST_ROW));
    assert_eq!(app.session.engine().dragging(), Some("page2"));
    app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5, FIRST_ROW));

    assert_eq!(app.session.engine().dragging(), None);
    assert!(app.session.engine().manual_order_active());
    assert_eq!(ids(&app), vec!["page2", "page1", "page3", "page4", "page5"]);
    assert_eq!(app.selected, 0);

    // A drag must not also count as a click.
    settle(&mut app);
    assert_eq!(app.session.engine().item("page2").expect("page2").status_id, "opt_c");

    let text = screen(&draw(&mut app));
    assert!(text.contains("manual order"));
}

#[test]
fn shift_arrows_move_the_selected_item() {
    let mut app = demo_app();
    app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT));
    assert_eq!(ids(&app), vec!["page3", "page1", "page2", "page4", "page5"]);
    assert_eq!(app.selected, 1);

    app.handle_key(key(KeyCode::Char('K')));
    assert_eq!(ids(&app), vec!["page1", "page3", "page2", "page4", "page5"]);
    assert_eq!(app.selected, 0);

    // Nothing above the first row.
    app.handle_key(key(KeyCode::Char('K')));
    assert_eq!(ids(&app), vec!["page1", "page3", "page2", "page4", "page5"]);
}

#[test]
fn status_menu_sets_a_chosen_status() {
    let mut app = demo_app();
    app.handle_key(key(KeyCode::Char('s')));
    let menu = app.menu.clone().expect("menu open");
    assert_eq!(menu.item_id, "page1");
    assert_eq!(menu.selected, 0);

    let text = screen(&draw(&mut app));
    assert!(text.contains("Status: page1"));
    assert!(text.contains("3 Done"));

    app.handle_key(key(KeyCode::Char('3')));
    assert!(app.menu.is_none());
    settle(&mut app);
    assert_eq!(app.session.engine().item("page1").expect("page1").status_id, "opt_c");
}

#[test]
fn escape_closes_menu_before_quitting() {
    let mut app = demo_app();
    app.handle_key(key(KeyCode::Char('s')));
    app.handle_key(key(KeyCode::Esc));
    assert!(app.menu.is_none());
    assert!(!app.quit);

    app.handle_key(key(KeyCode::Esc));
    assert!(app.quit);
}

#[test]
fn unknown_widget_shows_placeholder_and_notice() {
    let backend = Arc::new(LocalBackend::new(ItemStore::demo()));
    let mut app = App::new(Session::new(backend, "w_404"));
    app.start();
    settle(&mut app);

    assert!(app.notice.as_deref().is_some_and(|n| n.starts_with("load failed")));
    let text = screen(&draw(&mut app));
    assert!(text.contains("No data:"));
    assert!(text.contains("r: retry"));
    assert_eq!(app.row_at(5, FIRST_ROW), None);
}

#[test]
fn clicks_outside_the_list_hit_nothing() {
    let mut app = demo_app();
    draw(&mut app);
    assert_eq!(app.row_at(5, 0), None);
    assert_eq!(app.row_at(0, FIRST_ROW), None);
    assert_eq!(app.row_at(5, FIRST_ROW + 4), Some(4));
    assert_eq!(app.row_at(5, FIRST_ROW + 5), None);
}
