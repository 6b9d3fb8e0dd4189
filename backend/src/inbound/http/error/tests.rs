//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::test::TestRequest;
use rstest::rstest;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(response: HttpResponse) -> ErrorBody {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error body deserialises")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_their_message() {
    let response = ResponseError::error_response(&Error::not_found("user not found"));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_of(response).await, ErrorBody::new("user not found"));
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("failed to list users: relation \"users\" does not exist");
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_of(response).await, ErrorBody::new(REDACTED_MESSAGE));
}

#[rstest]
#[actix_web::test]
async fn trace_id_is_echoed_as_header() {
    let error = Error::invalid_request("bad").with_trace_id(TRACE_ID);
    let response = ResponseError::error_response(&error);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace-id header is set")
        .to_str()
        .expect("header is ASCII");
    assert_eq!(header, TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_omits_header() {
    let response = ResponseError::error_response(&Error::invalid_request("bad"));
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
}

#[rstest]
#[actix_web::test]
async fn json_errors_become_invalid_body() {
    let request = TestRequest::default().to_http_request();
    let payload_error = JsonPayloadError::ContentType;
    let error = json_error_handler(payload_error, &request);
    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_of(response).await, ErrorBody::new(INVALID_BODY_MESSAGE));
}
