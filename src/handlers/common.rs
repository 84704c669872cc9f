use crate::errors::ServiceError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|e| ServiceError::ValidationError(format!("Validation failed: {}", e)))
}

/// Unwraps a JSON body, turning extractor rejections into a 400
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload.map(|Json(body)| body).map_err(ServiceError::from)
}

/// Parses an integer path segment, reporting `message` when it is not one
pub fn parse_path_id(raw: &str, message: &str) -> Result<i32, ServiceError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ServiceError::ValidationError(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_path_id_accepts_integers_only() {
        assert_eq!(parse_path_id("42", "Invalid ID").unwrap(), 42);
        assert_matches!(
            parse_path_id("abc", "Invalid category ID"),
            Err(ServiceError::ValidationError(msg)) if msg == "Invalid category ID"
        );
        assert!(parse_path_id("1.5", "Invalid ID").is_err());
    }
}
