use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::{AppError, ValidationDetail};
use crate::product::dto::SearchProductsRequest;
use crate::server::AppState;

/// `POST /products/search`: read-only fan-in lookup of products by id
/// within one tenant.
pub async fn search_products(
    State(state): State<AppState>,
    payload: Result<Json<SearchProductsRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "invalid JSON body");
            return write_validation_error(
                "invalid JSON body",
                vec![ValidationDetail::new(
                    "body",
                    "request body must be valid JSON",
                )],
            );
        }
    };

    if let Err(AppError::Validation { message, details }) = validate_search_request(&req) {
        return write_validation_error(&message, details);
    }

    match state.products.search(req).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "search products failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "an unexpected error occurred",
                })),
            )
                .into_response()
        }
    }
}

fn validate_search_request(req: &SearchProductsRequest) -> Result<(), AppError> {
    if req.company_id <= 0 {
        let msg = if req.company_id == 0 {
            "companyId is required"
        } else {
            "companyId must be a positive integer"
        };
        return Err(AppError::validation(
            msg,
            vec![ValidationDetail::new("companyId", msg)],
        ));
    }

    if req.product_ids.is_empty() {
        return Err(AppError::validation(
            "productIds is required",
            vec![ValidationDetail::new(
                "productIds",
                "productIds must not be empty",
            )],
        ));
    }

    if req.product_ids.len() > 100 {
        let msg = "productIds exceeds maximum of 100";
        return Err(AppError::validation(
            msg,
            vec![ValidationDetail::new("productIds", msg)],
        ));
    }

    if req.product_ids.iter().any(|id| *id <= 0) {
        let msg = "each productId must be a positive integer";
        return Err(AppError::validation(
            msg,
            vec![ValidationDetail::new("productIds", msg)],
        ));
    }

    Ok(())
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
