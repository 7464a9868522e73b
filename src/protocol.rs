//! Sync protocol: the response envelope and the backend contract the view-model talks to.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};
use crate::model::{StatusUpdate, WidgetSnapshot};
use crate::store::ItemStore;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

/// `{ ok, data?, error? }` wrapper around every response body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &WidgetError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ApiErrorBody {
                code: err.code().to_string(),
                message: err.message().to_string(),
            }),
        }
    }

    /// Unwrap into data or a typed error. Never yields data for an `ok=false` envelope.
    pub fn into_result(self) -> WidgetResult<T> {
        match (self.ok, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (true, None, _) => Err(WidgetError::Transport(
                "envelope ok but data missing".to_string(),
            )),
            (false, _, Some(e)) => Err(WidgetError::from_api(&e.code, e.message)),
            (false, _, None) => Err(WidgetError::Transport(
                "envelope not ok and no error given".to_string(),
            )),
        }
    }
}

/// Query-all / cycle / set, as seen by the view-model. Implemented over HTTP by
/// [`crate::remote::WidgetClient`] and in-process by [`LocalBackend`].
pub trait StatusBackend: Send + Sync {
    fn query_all(&self, widget_id: &str) -> WidgetResult<WidgetSnapshot>;

    /// Not idempotent; callers must not retry on ambiguous failure.
    fn advance_status(&self, widget_id: &str, item_id: &str) -> WidgetResult<StatusUpdate>;

    fn set_status(
        &self,
        widget_id: &str,
        item_id: &str,
        status_id: &str,
    ) -> WidgetResult<StatusUpdate>;
}

/// Backend over an in-process store.
#[derive(Clone, Default)]
pub struct LocalBackend {
    store: Arc<Mutex<ItemStore>>,
}

impl LocalBackend {
    pub fn new(store: ItemStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut ItemStore) -> WidgetResult<T>) -> WidgetResult<T> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| WidgetError::Transport("item store lock poisoned".to_string()))?;
        f(&mut store)
    }
}

impl StatusBackend for LocalBackend {
    fn query_all(&self, widget_id: &str) -> WidgetResult<WidgetSnapshot> {
        self.with_store(|s| s.query_all(widget_id))
    }

    fn advance_status(&self, widget_id: &str, item_id: &str) -> WidgetResult<StatusUpdate> {
        self.with_store(|s| s.advance_status(widget_id, item_id))
    }

    fn set_status(
        &self,
        widget_id: &str,
        item_id: &str,
        status_id: &str,
    ) -> WidgetResult<StatusUpdate> {
        self.with_store(|s| s.set_status(widget_id, item_id, status_id))
    }
}
