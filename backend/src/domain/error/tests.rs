//! Tests for domain error construction and trace correlation.

use super::*;
use rstest::rstest;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn display_renders_message_only() {
    let error = Error::not_found("user not found");
    assert_eq!(error.to_string(), "user not found");
}

#[rstest]
fn context_prefixes_message() {
    let error = Error::service_unavailable("pool timed out").context("failed to list users");
    assert_eq!(error.message(), "failed to list users: pool timed out");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn trace_id_is_captured_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid trace id");
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn with_trace_id_overrides_value() {
    let error = Error::invalid_request("bad").with_trace_id("abc");
    assert_eq!(error.trace_id(), Some("abc"));
}

#[rstest]
#[case(ErrorCode::InvalidRequest, "invalid_request")]
#[case(ErrorCode::NotFound, "not_found")]
#[case(ErrorCode::ServiceUnavailable, "service_unavailable")]
#[case(ErrorCode::InternalError, "internal_error")]
fn error_codes_render_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
    assert_eq!(code.to_string(), expected);
}
