use std::sync::Arc;
use std::sync::atomic::AtomicU64;

/// Minimal counters for operational visibility.
#[derive(Clone, Default)]
pub struct Counters {
    pub reserve_requests: Arc<AtomicU64>,
    pub reserve_rejected: Arc<AtomicU64>,

    pub reserve_retries: Arc<AtomicU64>,
    pub reserve_deadlock_exhausted: Arc<AtomicU64>,

    pub items_reserved: Arc<AtomicU64>,
    pub items_rejected: Arc<AtomicU64>,
}
