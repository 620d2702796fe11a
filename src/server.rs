use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::order::usecase::ReserveAndAdd;
use crate::product::usecase::SearchProducts;
use crate::{order, product};

#[derive(Clone)]
pub struct AppState {
    pub reserve: Arc<dyn ReserveAndAdd>,
    pub products: Arc<dyn SearchProducts>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/orders/:orderId/reserve",
            post(order::controller::reserve_and_add),
        )
        .route(
            "/products/search",
            post(product::controller::search_products),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}
