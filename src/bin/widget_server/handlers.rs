use axum::extract::rejection::JsonRejection;

use status_widget::model::SetStatusRequest;
use status_widget::protocol::Envelope;

use super::*;

pub(super) async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({"app": "widget-server", "ok": true}))
}

pub(super) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

pub(super) async fn unknown_route() -> Response {
    envelope_err(&WidgetError::NotFound("no such route".to_string()))
}

pub(super) async fn wrong_method() -> Response {
    let err = WidgetError::Api {
        code: "METHOD_NOT_ALLOWED".to_string(),
        message: "method not allowed for this route".to_string(),
    };
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(Envelope::<()>::failure(&err)),
    )
        .into_response()
}

pub(super) async fn query_items(
    State(state): State<Arc<AppState>>,
    Path(widget_id): Path<String>,
) -> Response {
    let store = state.store.read().await;
    let res = store.query_all(&widget_id);
    if let Err(err) = &res {
        tracing::debug!(widget = %widget_id, code = err.code(), "query failed");
    }
    respond(res)
}

pub(super) async fn next_status(
    State(state): State<Arc<AppState>>,
    Path((widget_id, item_id)): Path<(String, String)>,
) -> Response {
    let mut store = state.store.write().await;
    let res = store.advance_status(&widget_id, &item_id);
    match &res {
        Ok(upd) => tracing::info!(
            widget = %widget_id,
            item = %item_id,
            status = %upd.status_id,
            "status advanced"
        ),
        Err(err) => tracing::info!(
            widget = %widget_id,
            item = %item_id,
            code = err.code(),
            "advance rejected"
        ),
    }
    respond(res)
}

pub(super) async fn set_status(
    State(state): State<Arc<AppState>>,
    Path((widget_id, item_id)): Path<(String, String)>,
    payload: Result<Json<SetStatusRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(p) => p,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let mut store = state.store.write().await;
    let res = store.set_status(&widget_id, &item_id, &body.status_id);
    match &res {
        Ok(upd) => tracing::info!(
            widget = %widget_id,
            item = %item_id,
            status = %upd.status_id,
            "status set"
        ),
        Err(err) => tracing::info!(
            widget = %widget_id,
            item = %item_id,
            requested = %body.status_id,
            code = err.code(),
            "set rejected"
        ),
    }
    respond(res)
}
