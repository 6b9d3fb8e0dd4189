//! Path parameter and body parsing for inbound HTTP adapters.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Error, UserValidationError};
use crate::inbound::http::error::INVALID_BODY_MESSAGE;

/// Parse a raw `{id}` path segment.
///
/// Only the numeric syntax is checked here; the service decides whether the
/// number is a valid identifier.
///
/// ```
/// use users_api::inbound::http::validation::parse_user_id;
///
/// assert_eq!(parse_user_id("42").ok(), Some(42));
/// assert!(parse_user_id("abc").is_err());
/// ```
pub fn parse_user_id(raw: &str) -> Result<i64, Error> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::invalid_request(UserValidationError::NonPositiveId.to_string()))
}

/// Decode a JSON request body already buffered by the handler.
///
/// Handlers that must validate path parameters first take the raw bytes and
/// call this afterwards; failures map to the same error as the shared JSON
/// extractor config.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "rejected request body");
        Error::invalid_request(INVALID_BODY_MESSAGE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case("9223372036854775807", i64::MAX)]
    #[case("0", 0)]
    #[case("-3", -3)]
    fn parses_integers(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(parse_user_id(raw).ok(), Some(expected));
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("1.5")]
    #[case("9223372036854775808")]
    fn rejects_non_numeric(#[case] raw: &str) {
        let error = parse_user_id(raw).expect_err("not an integer");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "invalid user ID");
    }

    #[rstest]
    #[case(b"{\"name\": \"Ann\"}".as_slice(), Some("Ann"))]
    #[case(b"{}".as_slice(), None)]
    fn decodes_json_objects(#[case] raw: &[u8], #[case] expected: Option<&str>) {
        let value: serde_json::Value = parse_json_body(raw).expect("valid json");
        assert_eq!(value.get("name").and_then(|name| name.as_str()), expected);
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"[1, 2".as_slice())]
    #[case(b"not json".as_slice())]
    fn malformed_bodies_are_invalid_requests(#[case] raw: &[u8]) {
        let error = parse_json_body::<serde_json::Value>(raw).expect_err("malformed");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), INVALID_BODY_MESSAGE);
    }
}
