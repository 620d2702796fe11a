use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use sqlx::mysql::MySqlRow;

use crate::domain::Product;
use crate::error::AppError;
use crate::product::repository::ProductRepository;

pub(crate) const PRODUCT_COLUMNS: &str = "id, external_id, name, description, price, stock, reserved_stock, \
     companyId, typeId, category, isActive, isDeleted, hasStock, Stockeable, \
     createdAt, updatedAt";

/// SQLx-backed implementation of ProductRepository.
/// Responsible only for persistence and row mapping.
pub struct SqlxProductRepository {
    pool: MySqlPool,
}

impl SqlxProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqlxProductRepository {
    async fn find_by_ids_and_company(
        &self,
        ids: &[i64],
        company_id: i64,
    ) -> Result<Vec<Product>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM Product \
             WHERE id IN ({placeholders}) AND companyId = ? AND isDeleted = 0"
        );

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        query = query.bind(company_id);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        let mut products = Vec::with_capacity(rows.len());
        for r in &rows {
            products.push(row_to_product(r)?);
        }

        Ok(products)
    }
}

/// Maps one `Product` row. Shared with the reservation store's lock-read,
/// which selects the same column list.
pub(crate) fn row_to_product(r: &MySqlRow) -> anyhow::Result<Product> {
    Ok(Product {
        id: r.try_get("id")?,
        external_id: r.try_get("external_id")?,
        name: r.try_get("name")?,
        description: r.try_get("description")?,
        price: r.try_get("price")?,
        stock: r.try_get("stock")?,
        reserved_stock: r.try_get("reserved_stock")?,
        company_id: r.try_get("companyId")?,
        type_id: r.try_get("typeId")?,
        category: r.try_get("category")?,
        is_active: r.try_get("isActive")?,
        is_deleted: r.try_get("isDeleted")?,
        has_stock: r.try_get("hasStock")?,
        stockeable: r.try_get("Stockeable")?,
        created_at: r.try_get("createdAt")?,
        updated_at: r.try_get("updatedAt")?,
    })
}
