//! Route table for the widget API.

#[derive(Clone, Copy, Debug)]
pub enum Endpoint<'a> {
    Query { widget_id: &'a str },
    NextStatus { widget_id: &'a str, item_id: &'a str },
    SetStatus { widget_id: &'a str, item_id: &'a str },
}

impl<'a> Endpoint<'a> {
    /// Path segments below the base URL. Ids are passed through as single segments.
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            Endpoint::Query { widget_id } => vec!["v1", "widgets", widget_id, "items", "query"],
            Endpoint::NextStatus { widget_id, item_id } => vec![
                "v1", "widgets", widget_id, "items", item_id, "status", "next",
            ],
            Endpoint::SetStatus { widget_id, item_id } => {
                vec!["v1", "widgets", widget_id, "items", item_id, "status"]
            }
        }
    }
}
