use serde::{Deserialize, Serialize};

/// Status color tag, taken from the Notion palette. Unknown names collapse to `Default`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusColor {
    Blue,
    Green,
    Yellow,
    Red,
    Gray,
    Orange,
    Purple,
    Pink,
    Brown,
    #[default]
    Default,
}

impl StatusColor {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => StatusColor::Blue,
            "green" => StatusColor::Green,
            "yellow" => StatusColor::Yellow,
            "red" => StatusColor::Red,
            "gray" | "grey" => StatusColor::Gray,
            "orange" => StatusColor::Orange,
            "purple" => StatusColor::Purple,
            "pink" => StatusColor::Pink,
            "brown" => StatusColor::Brown,
            _ => StatusColor::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusColor::Blue => "blue",
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Red => "red",
            StatusColor::Gray => "gray",
            StatusColor::Orange => "orange",
            StatusColor::Purple => "purple",
            StatusColor::Pink => "pink",
            StatusColor::Brown => "brown",
            StatusColor::Default => "default",
        }
    }
}

impl From<String> for StatusColor {
    fn from(s: String) -> Self {
        StatusColor::parse(&s)
    }
}

impl From<StatusColor> for String {
    fn from(c: StatusColor) -> Self {
        c.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOption {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub color: StatusColor,
}

impl StatusOption {
    pub fn new(id: &str, name: &str, color: StatusColor) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color,
        }
    }
}

/// Item as carried by `items/query`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub is_checked: bool,

    // Empty when the store has no status for the item.
    #[serde(default)]
    pub status_id: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub last_edited_time: String,
}

/// Payload of `items/query`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSnapshot {
    pub items: Vec<ItemSnapshot>,
    pub status_options: Vec<StatusOption>,
}

/// Payload of `status/next` and `PATCH status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: String,
    pub status_id: String,

    #[serde(default)]
    pub status: Option<String>,

    pub last_edited_time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status_id: String,
}

/// Item as held by the view-model. `ui_order` and `status_color` are local only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItem {
    pub id: String,
    pub title: String,
    pub is_checked: bool,
    pub status_id: String,
    pub status: Option<String>,
    pub last_edited_time: String,
    pub ui_order: usize,
    pub status_color: StatusColor,
}

impl ViewItem {
    pub fn from_snapshot(item: ItemSnapshot) -> Self {
        Self {
            id: item.id,
            title: item.title,
            is_checked: item.is_checked,
            status_id: item.status_id,
            status: item.status,
            last_edited_time: item.last_edited_time,
            ui_order: 0,
            status_color: StatusColor::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_snapshot_uses_camel_case_wire_names() {
        let raw = serde_json::json!({
            "id": "page1",
            "title": "Complete the Galle project",
            "isChecked": false,
            "statusId": "opt_a",
            "status": "To-do",
            "lastEditedTime": "2026-01-02T03:04:05Z"
        });
        let item: ItemSnapshot = serde_json::from_value(raw).expect("parse item");
        assert_eq!(item.status_id, "opt_a");
        assert_eq!(item.last_edited_time, "2026-01-02T03:04:05Z");
    }

    #[test]
    fn unknown_colors_fall_back_to_default() {
        let opt: StatusOption =
            serde_json::from_value(serde_json::json!({"id": "x", "name": "X", "color": "Teal"}))
                .expect("parse option");
        assert_eq!(opt.color, StatusColor::Default);

        let opt: StatusOption =
            serde_json::from_value(serde_json::json!({"id": "x", "name": "X", "color": "BLUE"}))
                .expect("parse option");
        assert_eq!(opt.color, StatusColor::Blue);
        assert_eq!(
            serde_json::to_value(&opt).expect("serialize")["color"],
            serde_json::json!("blue")
        );
    }
}
