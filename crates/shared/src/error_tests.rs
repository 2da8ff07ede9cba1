use super::*;

#[test]
fn test_app_error_status_codes() {
    assert_eq!(AppError::Unauthorized("test".into()).status_code(), 401);
    assert_eq!(AppError::Forbidden("test".into()).status_code(), 403);
    assert_eq!(AppError::NotFound("test".into()).status_code(), 404);
    assert_eq!(AppError::Validation("test".into()).status_code(), 400);
    assert_eq!(AppError::Conflict("test".into()).status_code(), 409);
    assert_eq!(AppError::Database("test".into()).status_code(), 500);
    assert_eq!(AppError::Internal("test".into()).status_code(), 500);
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(
        AppError::Unauthorized("test".into()).error_code(),
        "UNAUTHORIZED"
    );
    assert_eq!(AppError::Forbidden("test".into()).error_code(), "FORBIDDEN");
    assert_eq!(AppError::NotFound("test".into()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::Validation("test".into()).error_code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(AppError::Conflict("test".into()).error_code(), "CONFLICT");
    assert_eq!(
        AppError::Database("test".into()).error_code(),
        "DATABASE_ERROR"
    );
    assert_eq!(
        AppError::Internal("test".into()).error_code(),
        "INTERNAL_ERROR"
    );
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::NotFound("Campaign x".into())),
        "Not found: Campaign x"
    );
    assert_eq!(
        format!("{}", AppError::Validation("month must be 1-12".into())),
        "Validation error: month must be 1-12"
    );
    assert_eq!(
        format!("{}", AppError::Conflict("msg".into())),
        "Conflict: msg"
    );
}

#[test]
fn test_server_errors_are_flagged() {
    assert!(AppError::Database("pool".into()).is_server_error());
    assert!(AppError::Internal("x".into()).is_server_error());
    assert!(!AppError::Validation("x".into()).is_server_error());
    assert!(!AppError::NotFound("x".into()).is_server_error());
}
