use super::*;

fn parse(ts: &str) -> OffsetDateTime {
    OffsetDateTime::parse(ts, &Rfc3339).expect("rfc3339 timestamp")
}

#[test]
fn demo_store_reports_items_in_insertion_order() {
    let store = ItemStore::demo();
    let snap = store.query_all(DEMO_WIDGET_ID).expect("query demo");
    let ids: Vec<&str> = snap.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["page1", "page2", "page3", "page4", "page5"]);
    assert_eq!(snap.status_options.len(), 3);
    assert_eq!(snap.items[0].status.as_deref(), Some("To-do"));
}

#[test]
fn unknown_widget_and_item_are_not_found() {
    let mut store = ItemStore::demo();
    assert!(matches!(
        store.query_all("w_404"),
        Err(WidgetError::NotFound(_))
    ));
    assert!(matches!(
        store.advance_status(DEMO_WIDGET_ID, "page404"),
        Err(WidgetError::NotFound(_))
    ));
    // Missing item wins over a bad status id.
    assert!(matches!(
        store.set_status(DEMO_WIDGET_ID, "page404", "nope"),
        Err(WidgetError::NotFound(_))
    ));
}

#[test]
fn advance_cycles_through_catalog_and_wraps() {
    let mut store = ItemStore::demo();
    let seen: Vec<String> = (0..3)
        .map(|_| {
            store
                .advance_status(DEMO_WIDGET_ID, "page1")
                .expect("advance")
                .status_id
        })
        .collect();
    assert_eq!(seen, vec!["opt_b", "opt_c", "opt_a"]);
}

#[test]
fn set_status_rejects_unknown_status_without_touching_item() {
    let mut store = ItemStore::demo();
    let before = store.query_all(DEMO_WIDGET_ID).expect("query").items[0].clone();

    let err = store
        .set_status(DEMO_WIDGET_ID, "page1", "opt_z")
        .expect_err("bad status");
    assert_eq!(err.code(), "BAD_STATUS");

    let after = store.query_all(DEMO_WIDGET_ID).expect("query").items[0].clone();
    assert_eq!(before, after);
}

#[test]
fn set_status_assigns_and_names_the_option() {
    let mut store = ItemStore::demo();
    let upd = store
        .set_status(DEMO_WIDGET_ID, "page2", "opt_b")
        .expect("set");
    assert_eq!(upd.status_id, "opt_b");
    assert_eq!(upd.status.as_deref(), Some("In progress"));
}

#[test]
fn edit_time_never_goes_backwards() {
    let mut store = ItemStore::demo();
    let future = OffsetDateTime::now_utc() + time::Duration::days(365);
    {
        let w = store.widget_mut(DEMO_WIDGET_ID).expect("widget");
        w.item_mut("page3").expect("item").last_edited = future;
    }

    let upd = store
        .advance_status(DEMO_WIDGET_ID, "page3")
        .expect("advance");
    assert_eq!(parse(&upd.last_edited_time), future);

    let first = store
        .advance_status(DEMO_WIDGET_ID, "page1")
        .expect("advance");
    let second = store
        .advance_status(DEMO_WIDGET_ID, "page1")
        .expect("advance");
    assert!(parse(&second.last_edited_time) >= parse(&first.last_edited_time));
}

#[test]
fn unresolved_status_advances_to_second_option() {
    let seed = SeedFile {
        widgets: vec![SeedWidget {
            id: "w".to_string(),
            status_options: vec![
                StatusOption::new("a", "A", StatusColor::Blue),
                StatusOption::new("b", "B", StatusColor::Green),
            ],
            items: vec![SeedItem {
                id: "i".to_string(),
                title: "orphan".to_string(),
                is_checked: false,
                status_id: "gone".to_string(),
                last_edited_time: None,
            }],
        }],
    };
    let mut store = ItemStore::from_seed(seed).expect("seed");
    assert_eq!(store.query_all("w").expect("query").items[0].status, None);
    assert_eq!(store.advance_status("w", "i").expect("advance").status_id, "b");
}

#[test]
fn seed_rejects_duplicate_items_and_bad_catalogs() {
    let dup_items = SeedWidget {
        id: "w".to_string(),
        status_options: vec![StatusOption::new("a", "A", StatusColor::Blue)],
        items: vec![demo_item("x", "one", "a", false), demo_item("x", "two", "a", false)],
    };
    assert!(matches!(
        ItemStore::from_seed(SeedFile {
            widgets: vec![dup_items]
        }),
        Err(WidgetError::Validation(_))
    ));

    let dup_options = SeedWidget {
        id: "w".to_string(),
        status_options: vec![
            StatusOption::new("a", "A", StatusColor::Blue),
            StatusOption::new("a", "B", StatusColor::Blue),
        ],
        items: Vec::new(),
    };
    assert!(matches!(
        ItemStore::from_seed(SeedFile {
            widgets: vec![dup_options]
        }),
        Err(WidgetError::Validation(_))
    ));
}

#[test]
fn empty_catalog_cannot_advance() {
    let seed = SeedFile {
        widgets: vec![SeedWidget {
            id: "w".to_string(),
            status_options: Vec::new(),
            items: vec![demo_item("x", "one", "", false)],
        }],
    };
    let mut store = ItemStore::from_seed(seed).expect("seed");
    assert!(matches!(
        store.advance_status("w", "x"),
        Err(WidgetError::InvalidStatus(_))
    ));
}
