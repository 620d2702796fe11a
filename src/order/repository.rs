use async_trait::async_trait;

use crate::domain::{Order, OrderItem, OrderStatus, Product};
use crate::error::AppError;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Snapshot read of the order row; no lock taken.
    async fn find_by_id(&self, order_id: u64) -> Result<Option<Order>, AppError>;
}

/// The reservation engine's sole window onto persistence.
///
/// One `Tx` covers every lock-read, reserved-stock increment, order-item
/// insert, and the two order updates of a request. `commit`/`rollback`
/// consume the transaction; a dropped `Tx` rolls back, so every early exit
/// path releases its locks without ceremony.
#[async_trait]
pub trait ReservationStore: Send + Sync + 'static {
    type Tx: Send;

    /// Opens a repeatable-read transaction on a pooled connection.
    async fn begin(&self) -> Result<Self::Tx, AppError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), AppError>;

    async fn rollback(&self, tx: Self::Tx) -> Result<(), AppError>;

    /// Reads the product restricted to `isDeleted = 0` and the given
    /// tenant, acquiring an exclusive row lock held for the remainder of
    /// the transaction. Blocks (rather than failing) on a conflicting
    /// lock, up to the storage engine's lock-wait limit.
    async fn find_product_for_update(
        &self,
        tx: &mut Self::Tx,
        product_id: i64,
        company_id: i64,
    ) -> Result<Option<Product>, AppError>;

    /// `reserved_stock := COALESCE(reserved_stock, 0) + delta`. The row is
    /// already locked by this transaction, so this never waits.
    async fn increment_reserved_stock(
        &self,
        tx: &mut Self::Tx,
        product_id: i64,
        delta: i32,
    ) -> Result<(), AppError>;

    /// Appends an order-item row; returns the server-assigned id.
    async fn insert_order_item(
        &self,
        tx: &mut Self::Tx,
        item: &OrderItem,
    ) -> Result<u64, AppError>;

    /// Moves the order from `from` to `to`; returns rows affected. Zero
    /// means the order is gone or no longer in `from`.
    async fn update_order_status(
        &self,
        tx: &mut Self::Tx,
        order_id: u64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<u64, AppError>;

    /// Rewrites the order total; returns rows affected.
    async fn update_order_total_price(
        &self,
        tx: &mut Self::Tx,
        order_id: u64,
        total_price: f64,
    ) -> Result<u64, AppError>;
}
