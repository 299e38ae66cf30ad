use learnsphere_error::{GeminiError, GeminiErrorKind, StatusCarrier};
use learnsphere_rate_limit::{FailureClass, classify_error};

/// Error shape with independent control over both status locations.
struct RawError {
    code: Option<u16>,
    body: Option<String>,
}

impl StatusCarrier for RawError {
    fn status_code(&self) -> Option<u16> {
        self.code
    }

    fn error_body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

fn raw(code: Option<u16>, body: Option<&str>) -> RawError {
    RawError {
        code,
        body: body.map(str::to_string),
    }
}

#[test]
fn structured_429_is_quota() {
    assert_eq!(classify_error(&raw(Some(429), None)), FailureClass::Quota);
}

#[test]
fn structured_code_takes_precedence_over_body() {
    let err = raw(Some(503), Some(r#"{"error":{"code":429}}"#));
    assert_eq!(classify_error(&err), FailureClass::Permanent);
}

#[test]
fn embedded_429_is_quota() {
    let err = raw(None, Some(r#"got status 429 Too Many Requests"#));
    assert_eq!(classify_error(&err), FailureClass::Quota);
}

#[test]
fn resource_exhausted_status_is_quota() {
    let err = raw(None, Some(r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#));
    assert_eq!(classify_error(&err), FailureClass::Quota);
}

#[test]
fn digits_inside_larger_numbers_do_not_match() {
    let err = raw(None, Some("request id 14290 failed"));
    assert_eq!(classify_error(&err), FailureClass::Permanent);
}

#[test]
fn no_status_information_is_permanent() {
    assert_eq!(classify_error(&raw(None, None)), FailureClass::Permanent);
}

#[test]
fn gemini_error_kinds_without_body_are_permanent() {
    for kind in [
        GeminiErrorKind::Network("429 in a message".to_string()),
        GeminiErrorKind::Timeout(30),
        GeminiErrorKind::EmptyResponse,
        GeminiErrorKind::InvalidResponse("429".to_string()),
        GeminiErrorKind::StreamInterrupted("429".to_string()),
    ] {
        assert_eq!(
            classify_error(&GeminiError::new(kind)),
            FailureClass::Permanent
        );
    }
}

#[test]
fn gemini_api_request_body_is_searched() {
    let err = GeminiError::new(GeminiErrorKind::ApiRequest(
        r#"{"error":{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#.to_string(),
    ));
    assert_eq!(classify_error(&err), FailureClass::Quota);
}
