use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::company::repository::CompanyConfigRepository;
use crate::domain::OrderStatus;
use crate::error::AppError;
use crate::metrics::counters::Counters;
use crate::order::dto::{ReservationItem, ReservationResult};
use crate::order::repository::OrderRepository;

/// Seam between the orchestrator and the transactional engine.
#[async_trait]
pub trait StockReservation: Send + Sync {
    async fn reserve_items(
        &self,
        order_id: u64,
        company_id: i64,
        items: &[ReservationItem],
    ) -> Result<ReservationResult, AppError>;
}

/// Seam the HTTP layer depends on.
#[async_trait]
pub trait ReserveAndAdd: Send + Sync {
    async fn reserve_items(
        &self,
        order_id: u64,
        company_id: i64,
        items: Vec<ReservationItem>,
    ) -> Result<ReservationResult, AppError>;
}

/// Reserve-and-add orchestrator: pre-validates outside any transaction,
/// fixes the lock order, and drives the engine under a bounded deadlock
/// retry budget.
pub struct ReserveAndAddUseCase {
    orders: Arc<dyn OrderRepository>,
    company_configs: Arc<dyn CompanyConfigRepository>,
    reservations: Arc<dyn StockReservation>,
    counters: Counters,
    max_retry_attempts: u32,
}

impl ReserveAndAddUseCase {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        company_configs: Arc<dyn CompanyConfigRepository>,
        reservations: Arc<dyn StockReservation>,
        counters: Counters,
        max_retry_attempts: u32,
    ) -> Self {
        Self {
            orders,
            company_configs,
            reservations,
            counters,
            max_retry_attempts,
        }
    }

    /// Sequential gates, first failure short-circuits. Runs on snapshot
    /// reads only; the engine re-checks the PENDING edge under lock.
    async fn pre_validate(&self, order_id: u64, company_id: i64) -> Result<(), AppError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

        if order.status != OrderStatus::Pending {
            return Err(AppError::Conflict(
                "order is not in PENDING status".to_string(),
            ));
        }

        // Cross-tenant isolation: an authenticated caller must not reach
        // another company's order even with a guessed id.
        if order.company_id != company_id {
            return Err(AppError::Forbidden("company mismatch".to_string()));
        }

        let config = self
            .company_configs
            .find_by_company_id(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("company config not found".to_string()))?;

        debug!(
            order_id,
            order_status = order.status.as_str(),
            has_stock_control = config.has_stock,
            "pre-validation passed"
        );

        Ok(())
    }

    async fn reserve_with_retry(
        &self,
        order_id: u64,
        company_id: i64,
        items: &[ReservationItem],
    ) -> Result<ReservationResult, AppError> {
        let max_attempts = self.max_retry_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self
                .reservations
                .reserve_items(order_id, company_id, items)
                .await
            {
                Ok(result) => {
                    self.counters
                        .items_reserved
                        .fetch_add(result.successes.len() as u64, Ordering::Relaxed);
                    self.counters
                        .items_rejected
                        .fetch_add(result.failures.len() as u64, Ordering::Relaxed);
                    return Ok(result);
                }
                Err(err) if err.is_deadlock() => {
                    if attempt == max_attempts {
                        break;
                    }

                    let backoff = backoff_with_jitter(attempt);
                    warn!(
                        order_id,
                        attempt,
                        max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        "deadlock detected, retrying"
                    );
                    self.counters.reserve_retries.fetch_add(1, Ordering::Relaxed);
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }

        self.counters
            .reserve_deadlock_exhausted
            .fetch_add(1, Ordering::Relaxed);
        Err(AppError::Deadlock("max retries exceeded".to_string()))
    }
}

/// `base(k) × uniform(0.8, 1.2)` with `base(k) = 100ms × k`, where `k` is
/// the attempt that just failed. The jitter decorrelates clients retrying
/// after the same contended event.
fn backoff_with_jitter(failed_attempt: u32) -> Duration {
    let base = Duration::from_millis(100 * u64::from(failed_attempt));
    base.mul_f64(rand::thread_rng().gen_range(0.8..=1.2))
}

#[async_trait]
impl ReserveAndAdd for ReserveAndAddUseCase {
    async fn reserve_items(
        &self,
        order_id: u64,
        company_id: i64,
        mut items: Vec<ReservationItem>,
    ) -> Result<ReservationResult, AppError> {
        self.counters.reserve_requests.fetch_add(1, Ordering::Relaxed);
        info!(
            order_id,
            company_id,
            item_count = items.len(),
            "reserve-and-add started"
        );

        if let Err(err) = self.pre_validate(order_id, company_id).await {
            self.counters.reserve_rejected.fetch_add(1, Ordering::Relaxed);
            return Err(err);
        }

        // Every concurrent request acquires row locks in ascending product
        // id order, which rules out circular waits among well-formed
        // callers. Ids are unique past the boundary, so the sort order is
        // total.
        items.sort_unstable_by_key(|item| item.product_id);

        self.reserve_with_retry(order_id, company_id, &items).await
    }
}
