use serde::{Deserialize, Serialize};

use crate::domain::Product;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchProductsRequest {
    pub company_id: i64,
    pub product_ids: Vec<i64>,
}

impl Default for SearchProductsRequest {
    fn default() -> Self {
        Self {
            company_id: 0,
            product_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub external_id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: Option<i64>,
    pub reserved_stock: Option<i64>,
    pub available_stock: i64,
    pub category: String,
    pub is_active: bool,
    pub has_stock: bool,
    pub stockeable: bool,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            external_id: p.external_id,
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            stock: p.stock,
            reserved_stock: p.reserved_stock,
            available_stock: p.available_stock(),
            category: p.category.clone(),
            is_active: p.is_active,
            has_stock: p.has_stock,
            stockeable: p.stockeable,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProductsResponse {
    pub products: Vec<ProductDto>,
    pub not_found: Vec<i64>,
}
