use async_trait::async_trait;

use crate::domain::Product;
use crate::error::AppError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Snapshot read of live (non-deleted) products matching the given ids
    /// within one tenant. Ids with no matching row are simply absent from
    /// the result.
    async fn find_by_ids_and_company(
        &self,
        ids: &[i64],
        company_id: i64,
    ) -> Result<Vec<Product>, AppError>;
}
