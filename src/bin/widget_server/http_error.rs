use serde::Serialize;

use status_widget::error::CODE_BAD_REQUEST;
use status_widget::protocol::Envelope;

use super::*;

pub(super) fn status_for(err: &WidgetError) -> StatusCode {
    match err {
        WidgetError::NotFound(_) => StatusCode::NOT_FOUND,
        WidgetError::InvalidStatus(_) | WidgetError::Api { .. } => StatusCode::BAD_REQUEST,
        WidgetError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WidgetError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(super) fn envelope_ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(Envelope::success(data))).into_response()
}

pub(super) fn envelope_err(err: &WidgetError) -> Response {
    (status_for(err), Json(Envelope::<()>::failure(err))).into_response()
}

pub(super) fn respond<T: Serialize>(res: Result<T, WidgetError>) -> Response {
    match res {
        Ok(data) => envelope_ok(data),
        Err(err) => envelope_err(&err),
    }
}

pub(super) fn bad_request(message: impl Into<String>) -> Response {
    envelope_err(&WidgetError::Api {
        code: CODE_BAD_REQUEST.to_string(),
        message: message.into(),
    })
}

#[cfg(test)]
#[path = "../../tests/bin/widget_server/http_error_tests.rs"]
mod tests;
