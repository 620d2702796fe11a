use std::collections::HashSet;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

use crate::error::{AppError, ValidationDetail};
use crate::logger::TraceId;
use crate::order::dto::{
    ReservationResult, ReservationStatus, ReserveAndAddErrorResponse, ReserveAndAddRequest,
    ReserveAndAddResponse,
};
use crate::server::AppState;

const MAX_ITEMS: usize = 100;
const MAX_QUANTITY: i32 = 10_000;

/// `POST /orders/:orderId/reserve`, the reserve-and-add endpoint.
pub async fn reserve_and_add(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    payload: Result<Json<ReserveAndAddRequest>, JsonRejection>,
) -> Response {
    let trace_id = TraceId::new();

    // The path segment is decoded by hand so a malformed id produces the
    // structured validation envelope instead of the framework default.
    let order_id = match order_id.parse::<u64>() {
        Ok(id) if id >= 1 => id,
        _ => {
            tracing::warn!(trace_id = trace_id.as_str(), "invalid orderId in path");
            return write_validation_error(
                "invalid orderId",
                vec![ValidationDetail::new(
                    "orderId",
                    "orderId must be a positive integer",
                )],
            );
        }
    };

    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            tracing::warn!(
                trace_id = trace_id.as_str(),
                error = %rejection,
                "invalid JSON body"
            );
            return write_validation_error(
                "invalid JSON body",
                vec![ValidationDetail::new(
                    "body",
                    "request body must be valid JSON",
                )],
            );
        }
    };

    if let Err(AppError::Validation { message, details }) = validate_reserve_request(&req) {
        return write_validation_error(&message, details);
    }

    match state
        .reserve
        .reserve_items(order_id, req.company_id, req.items)
        .await
    {
        Ok(result) => write_result(&trace_id, &result),
        Err(err) => write_use_case_error(&trace_id, order_id, &err),
    }
}

fn validate_reserve_request(req: &ReserveAndAddRequest) -> Result<(), AppError> {
    let mut details: Vec<ValidationDetail> = Vec::new();

    if req.company_id <= 0 {
        let msg = if req.company_id == 0 {
            "companyId is required"
        } else {
            "companyId must be a positive integer"
        };
        details.push(ValidationDetail::new("companyId", msg));
    }

    if req.items.is_empty() {
        details.push(ValidationDetail::new("items", "items must not be empty"));
    }

    if req.items.len() > MAX_ITEMS {
        details.push(ValidationDetail::new(
            "items",
            "items exceeds maximum of 100",
        ));
    }

    let mut seen: HashSet<i64> = HashSet::new();

    for (idx, item) in req.items.iter().enumerate() {
        if item.product_id <= 0 {
            details.push(ValidationDetail::new(
                format!("items[{idx}].productId"),
                "each productId must be a positive integer",
            ));
        }

        if !seen.insert(item.product_id) {
            details.push(ValidationDetail::new(
                format!("items[{idx}].productId"),
                "productId must not be duplicated",
            ));
        }

        if item.quantity < 1 || item.quantity > MAX_QUANTITY {
            details.push(ValidationDetail::new(
                format!("items[{idx}].quantity"),
                "quantity must be between 1 and 10000",
            ));
        }

        if item.price < 0.0 {
            details.push(ValidationDetail::new(
                format!("items[{idx}].price"),
                "price must be non-negative",
            ));
        }
    }

    if details.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation("validation failed", details))
    }
}

fn write_result(trace_id: &TraceId, result: &ReservationResult) -> Response {
    let status = match result.status {
        ReservationStatus::AllSuccess => StatusCode::OK,
        ReservationStatus::Partial => StatusCode::PARTIAL_CONTENT,
        ReservationStatus::AllFailed => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let body = ReserveAndAddResponse {
        trace_id: trace_id.as_str().to_string(),
        order_id: result.order_id,
        status: result.status,
        total_price: result.total_price,
        added_items: result.successes.iter().map(|s| s.product_id).collect(),
        successes: result.successes.clone(),
        failures: result.failures.clone(),
        timestamp: Utc::now(),
    };

    (status, Json(body)).into_response()
}

fn write_use_case_error(trace_id: &TraceId, order_id: u64, err: &AppError) -> Response {
    let (status, code, message) = match err {
        AppError::Validation { message, details } => {
            return write_validation_error(message, details.clone());
        }
        AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        AppError::Deadlock(msg) => (StatusCode::CONFLICT, "DEADLOCK", msg.clone()),
        AppError::Internal(cause) => {
            tracing::error!(
                trace_id = trace_id.as_str(),
                order_id,
                error = ?cause,
                "unexpected error"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "an unexpected error occurred".to_string(),
            )
        }
    };

    let body = ReserveAndAddErrorResponse {
        trace_id: trace_id.as_str().to_string(),
        status: status.as_u16(),
        code: code.to_string(),
        message,
        order_id,
        details: None,
        timestamp: Utc::now(),
    };

    (status, Json(body)).into_response()
}

fn write_validation_error(message: &str, details: Vec<ValidationDetail>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "VALIDATION_ERROR",
            "message": message,
            "details": details,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::dto::ReservationItem;

    fn item(product_id: i64, quantity: i32, price: f64) -> ReservationItem {
        ReservationItem {
            product_id,
            quantity,
            price,
        }
    }

    fn req(company_id: i64, items: Vec<ReservationItem>) -> ReserveAndAddRequest {
        ReserveAndAddRequest { company_id, items }
    }

    fn details(err: AppError) -> Vec<ValidationDetail> {
        match err {
            AppError::Validation { details, .. } => details,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        assert!(validate_reserve_request(&req(7, vec![item(5, 1, 10.0)])).is_ok());
    }

    #[test]
    fn company_id_zero_reports_required_negative_reports_positive() {
        let d = details(validate_reserve_request(&req(0, vec![item(5, 1, 1.0)])).unwrap_err());
        assert_eq!(d[0].message, "companyId is required");

        let d = details(validate_reserve_request(&req(-1, vec![item(5, 1, 1.0)])).unwrap_err());
        assert_eq!(d[0].message, "companyId must be a positive integer");
    }

    #[test]
    fn empty_items_are_rejected() {
        let d = details(validate_reserve_request(&req(7, vec![])).unwrap_err());
        assert_eq!(d[0].field, "items");
    }

    #[test]
    fn item_count_boundary_is_100() {
        let hundred: Vec<_> = (1..=100).map(|id| item(id, 1, 1.0)).collect();
        assert!(validate_reserve_request(&req(7, hundred)).is_ok());

        let too_many: Vec<_> = (1..=101).map(|id| item(id, 1, 1.0)).collect();
        let d = details(validate_reserve_request(&req(7, too_many)).unwrap_err());
        assert!(d.iter().any(|d| d.message.contains("maximum of 100")));
    }

    #[test]
    fn quantity_boundaries_are_1_and_10000() {
        assert!(validate_reserve_request(&req(7, vec![item(5, 1, 1.0)])).is_ok());
        assert!(validate_reserve_request(&req(7, vec![item(5, 10_000, 1.0)])).is_ok());

        for qty in [0, 10_001] {
            let d = details(validate_reserve_request(&req(7, vec![item(5, qty, 1.0)])).unwrap_err());
            assert!(d.iter().any(|d| d.message.contains("between 1 and 10000")));
        }
    }

    #[test]
    fn zero_price_is_accepted_negative_is_not() {
        assert!(validate_reserve_request(&req(7, vec![item(5, 1, 0.0)])).is_ok());

        let d = details(validate_reserve_request(&req(7, vec![item(5, 1, -0.01)])).unwrap_err());
        assert!(d.iter().any(|d| d.message.contains("non-negative")));
    }

    #[test]
    fn duplicate_product_ids_are_rejected() {
        let d = details(
            validate_reserve_request(&req(7, vec![item(5, 1, 1.0), item(5, 2, 1.0)])).unwrap_err(),
        );
        assert!(d.iter().any(|d| d.message.contains("duplicated")));
        assert!(d.iter().any(|d| d.field == "items[1].productId"));
    }

    #[test]
    fn non_positive_product_ids_are_rejected() {
        let d = details(validate_reserve_request(&req(7, vec![item(0, 1, 1.0)])).unwrap_err());
        assert!(d.iter().any(|d| d.message.contains("positive integer")));
    }

    #[test]
    fn violations_accumulate_across_fields() {
        let d = details(validate_reserve_request(&req(0, vec![item(-1, 0, -1.0)])).unwrap_err());
        assert_eq!(d.len(), 4);
    }
}
