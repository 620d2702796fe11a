use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{OrderItem, OrderStatus};
use crate::error::AppError;
use crate::logger::warn_if_slow;
use crate::order::dto::{
    FailureReason, ItemFailure, ItemSuccess, ReservationItem, ReservationResult,
    ReservationStatus,
};
use crate::order::repository::ReservationStore;
use crate::order::usecase::StockReservation;

/// Transactional reservation engine.
///
/// One call = one storage transaction spanning every lock-read, stock
/// mutation, item insert, and the final order rewrite. Commit is reached
/// only on the explicit success branch; every other exit path drops or
/// rolls back the transaction.
pub struct ReservationService<S: ReservationStore> {
    store: Arc<S>,
    tx_timeout: Duration,
}

impl<S: ReservationStore> ReservationService<S> {
    pub fn new(store: Arc<S>, tx_timeout: Duration) -> Self {
        Self { store, tx_timeout }
    }

    async fn reserve_attempt(
        &self,
        order_id: u64,
        company_id: i64,
        items: &[ReservationItem],
    ) -> Result<ReservationResult, AppError> {
        let mut tx = self.store.begin().await?;

        let mut successes: Vec<ItemSuccess> = Vec::new();
        let mut failures: Vec<ItemFailure> = Vec::new();
        let mut total_price = 0.0;

        // Items arrive sorted by product id; locks are therefore acquired
        // in the same order by every concurrent request.
        for item in items {
            match self.reserve_line(&mut tx, order_id, company_id, item).await? {
                None => {
                    successes.push(ItemSuccess {
                        product_id: item.product_id,
                        quantity: item.quantity,
                    });
                    total_price += item.price * f64::from(item.quantity);
                    info!(
                        order_id,
                        product_id = item.product_id,
                        quantity = item.quantity,
                        "item reserved"
                    );
                }
                Some(reason) => {
                    failures.push(ItemFailure {
                        product_id: item.product_id,
                        quantity: item.quantity,
                        reason,
                    });
                    warn!(
                        order_id,
                        product_id = item.product_id,
                        quantity = item.quantity,
                        reason = ?reason,
                        "item rejected"
                    );
                }
            }
        }

        if successes.is_empty() {
            self.store.rollback(tx).await?;
            warn!(
                order_id,
                failure_count = failures.len(),
                "transaction rolled back (all lines rejected)"
            );
            return Ok(ReservationResult {
                status: ReservationStatus::AllFailed,
                order_id,
                total_price: 0.0,
                successes,
                failures,
            });
        }

        let rows = self
            .store
            .update_order_status(&mut tx, order_id, OrderStatus::Pending, OrderStatus::Created)
            .await?;
        if rows == 0 {
            // The order was observed PENDING outside this transaction but
            // left that state before the guarded update ran.
            return Err(AppError::Conflict(
                "order is not in PENDING status".to_string(),
            ));
        }

        let rows = self
            .store
            .update_order_total_price(&mut tx, order_id, total_price)
            .await?;
        if rows == 0 {
            return Err(AppError::Internal(anyhow!(
                "order {order_id} vanished while updating total price"
            )));
        }

        self.store.commit(tx).await?;

        info!(
            order_id,
            success_count = successes.len(),
            failure_count = failures.len(),
            total_price,
            "transaction committed"
        );

        let status = if failures.is_empty() {
            ReservationStatus::AllSuccess
        } else {
            ReservationStatus::Partial
        };

        Ok(ReservationResult {
            status,
            order_id,
            total_price,
            successes,
            failures,
        })
    }

    /// Classifies one line under the row lock. `Ok(None)` means the line
    /// was reserved and its order item persisted; `Ok(Some(reason))` means
    /// the line was rejected without touching any row. Storage faults abort
    /// the whole request.
    async fn reserve_line(
        &self,
        tx: &mut S::Tx,
        order_id: u64,
        company_id: i64,
        item: &ReservationItem,
    ) -> Result<Option<FailureReason>, AppError> {
        let product = warn_if_slow(
            "product_lock_read",
            Duration::from_millis(250),
            self.store
                .find_product_for_update(tx, item.product_id, company_id),
        )
        .await?;

        let Some(product) = product else {
            return Ok(Some(FailureReason::NotFound));
        };

        if !product.is_active {
            return Ok(Some(FailureReason::ProductInactive));
        }

        if !product.has_stock || !product.stockeable {
            return Ok(Some(FailureReason::ProductNotStockeable));
        }

        let available = product.available_stock();
        if available == 0 {
            return Ok(Some(FailureReason::OutOfStock));
        }
        if available < i64::from(item.quantity) {
            return Ok(Some(FailureReason::InsufficientAvailable));
        }

        self.store
            .increment_reserved_stock(tx, item.product_id, item.quantity)
            .await?;

        self.store
            .insert_order_item(
                tx,
                &OrderItem {
                    order_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                },
            )
            .await?;

        Ok(None)
    }
}

#[async_trait]
impl<S: ReservationStore> StockReservation for ReservationService<S> {
    async fn reserve_items(
        &self,
        order_id: u64,
        company_id: i64,
        items: &[ReservationItem],
    ) -> Result<ReservationResult, AppError> {
        // The deadline bounds every suspension point of the attempt:
        // begin, contended lock-reads, and commit. On expiry the
        // transaction future is dropped, which rolls it back.
        match tokio::time::timeout(
            self.tx_timeout,
            self.reserve_attempt(order_id, company_id, items),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AppError::Internal(anyhow!(
                "reservation transaction exceeded {:?} deadline",
                self.tx_timeout
            ))),
        }
    }
}
