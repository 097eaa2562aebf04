//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "An internal server error occurred",
        "data": null,
        "error": "DATABASE_ERROR",
        "code": 2001
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Request validation failed",
        "data": null,
        "error": "VALIDATION_ERROR",
        "code": 1001,
        "details": {
            "title": [{
                "code": "length",
                "message": "Title must be between 3 and 20 characters",
                "params": {"min": 3, "max": 20, "value": "ab"}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Invalid UUID: not-a-uuid",
        "data": null,
        "error": "INVALID_UUID",
        "code": 1002
    })
)]
pub struct BadRequestUuidResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid query",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Invalid value 'cheap' for field 'price'",
        "data": null,
        "error": "INVALID_QUERY_VALUE",
        "code": 1103
    })
)]
pub struct BadRequestQueryResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Resource not found",
        "data": null,
        "error": "NOT_FOUND",
        "code": 1004
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Service is temporarily unavailable",
        "data": null,
        "error": "SERVICE_UNAVAILABLE",
        "code": 1503
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
