use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};

use crate::domain::{Order, OrderItem, OrderStatus, Product};
use crate::error::AppError;
use crate::order::repository::{OrderRepository, ReservationStore};
use crate::product::repository_sqlx::{PRODUCT_COLUMNS, row_to_product};

/// SQLx-backed implementation of OrderRepository.
pub struct SqlxOrderRepository {
    pool: MySqlPool,
}

impl SqlxOrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SqlxOrderRepository {
    async fn find_by_id(&self, order_id: u64) -> Result<Option<Order>, AppError> {
        let row = sqlx::query(
            r#"
SELECT id, companyId, firstName, lastName, email, phone, address,
       status, totalPrice, createdAt, updatedAt
FROM Orders
WHERE id = ?;
"#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        match row {
            Some(r) => Ok(Some(row_to_order(&r)?)),
            None => Ok(None),
        }
    }
}

/// SQLx-backed implementation of ReservationStore.
/// Responsible only for persistence and row mapping; every classification
/// decision lives in the reservation service.
pub struct SqlxReservationStore {
    pool: MySqlPool,
}

impl SqlxReservationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for SqlxReservationStore {
    type Tx = Transaction<'static, MySql>;

    async fn begin(&self) -> Result<Self::Tx, AppError> {
        // Session isolation is pinned to REPEATABLE READ at connect time
        // (see db::Db::connect).
        self.pool.begin().await.map_err(AppError::from)
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), AppError> {
        tx.commit().await.map_err(AppError::from)
    }

    async fn rollback(&self, tx: Self::Tx) -> Result<(), AppError> {
        tx.rollback().await.map_err(AppError::from)
    }

    async fn find_product_for_update(
        &self,
        tx: &mut Self::Tx,
        product_id: i64,
        company_id: i64,
    ) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM Product \
             WHERE id = ? AND companyId = ? AND isDeleted = 0 \
             FOR UPDATE"
        );

        let row = sqlx::query(&sql)
            .bind(product_id)
            .bind(company_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(AppError::from)?;

        match row {
            Some(r) => Ok(Some(row_to_product(&r)?)),
            None => Ok(None),
        }
    }

    async fn increment_reserved_stock(
        &self,
        tx: &mut Self::Tx,
        product_id: i64,
        delta: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
UPDATE Product
SET reserved_stock = COALESCE(reserved_stock, 0) + ?
WHERE id = ?;
"#,
        )
        .bind(delta)
        .bind(product_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn insert_order_item(
        &self,
        tx: &mut Self::Tx,
        item: &OrderItem,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
INSERT INTO OrderItems (orderId, productId, quantity, price)
VALUES (?, ?, ?, ?);
"#,
        )
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut **tx)
        .await
        .map_err(AppError::from)?;

        Ok(result.last_insert_id())
    }

    async fn update_order_status(
        &self,
        tx: &mut Self::Tx,
        order_id: u64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
UPDATE Orders
SET status = ?
WHERE id = ? AND status = ?;
"#,
        )
        .bind(to.as_str())
        .bind(order_id)
        .bind(from.as_str())
        .execute(&mut **tx)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected())
    }

    async fn update_order_total_price(
        &self,
        tx: &mut Self::Tx,
        order_id: u64,
        total_price: f64,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
UPDATE Orders
SET totalPrice = ?
WHERE id = ?;
"#,
        )
        .bind(total_price)
        .bind(order_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected())
    }
}

fn row_to_order(r: &MySqlRow) -> anyhow::Result<Order> {
    let status: String = r.try_get("status")?;

    Ok(Order {
        id: r.try_get("id")?,
        company_id: r.try_get("companyId")?,
        first_name: r.try_get("firstName")?,
        last_name: r.try_get("lastName")?,
        email: r.try_get("email")?,
        phone: r.try_get("phone")?,
        address: r.try_get("address")?,
        status: status.parse()?,
        total_price: r.try_get("totalPrice")?,
        created_at: r.try_get("createdAt")?,
        updated_at: r.try_get("updatedAt")?,
    })
}
