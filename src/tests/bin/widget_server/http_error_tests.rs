use super::*;

#[test]
fn store_errors_map_to_http_statuses() {
    assert_eq!(
        status_for(&WidgetError::NotFound("item not found".to_string())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_for(&WidgetError::InvalidStatus("invalid statusId".to_string())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(&WidgetError::Validation("dup".to_string())),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn error_envelope_keeps_the_wire_code() {
    let resp = respond::<()>(Err(WidgetError::InvalidStatus("invalid statusId".to_string())));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({"ok": false, "error": {"code": "BAD_STATUS", "message": "invalid statusId"}})
    );

    let resp = bad_request("missing field `statusId`");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["code"], "BAD_REQUEST");

    let resp = respond(Ok(serde_json::json!({"id": "page1"})));
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({"ok": true, "data": {"id": "page1"}})
    );
}
