use super::*;

#[test]
fn request_failed_message_formats_status() {
    assert_eq!(request_failed_message(500), "request failed: 500");
}

#[test]
fn upload_failed_message_formats_status() {
    assert_eq!(upload_failed_message(413), "upload failed: 413");
}

#[test]
fn remote_prefers_detail_field() {
    let err = ApiError::remote(404, r#"{"detail":"Document not found"}"#, request_failed_message);
    assert_eq!(err, ApiError::Remote { status: 404, message: "Document not found".into() });
    assert_eq!(err.to_string(), "Document not found");
}

#[test]
fn remote_falls_back_when_body_is_not_json() {
    let err = ApiError::remote(502, "<html>bad gateway</html>", request_failed_message);
    assert_eq!(err.to_string(), "request failed: 502");
}

#[test]
fn remote_falls_back_when_detail_is_not_a_string() {
    let body = r#"{"detail":[{"loc":["body","content"],"msg":"field required"}]}"#;
    let err = ApiError::remote(422, body, upload_failed_message);
    assert_eq!(err.to_string(), "upload failed: 422");
}

#[test]
fn remote_falls_back_when_detail_is_blank() {
    let err = ApiError::remote(500, r#"{"detail":"  "}"#, request_failed_message);
    assert_eq!(err.to_string(), "request failed: 500");
}

#[test]
fn status_only_reported_for_remote() {
    assert_eq!(ApiError::Remote { status: 400, message: "x".into() }.status(), Some(400));
    assert_eq!(ApiError::Transport("refused".into()).status(), None);
    assert_eq!(ApiError::Decode("eof".into()).status(), None);
}

#[test]
fn transport_display_is_prefixed() {
    assert_eq!(ApiError::Transport("connection refused".into()).to_string(), "network error: connection refused");
}
