use async_trait::async_trait;

use crate::domain::CompanyConfig;
use crate::error::AppError;

#[async_trait]
pub trait CompanyConfigRepository: Send + Sync {
    /// Snapshot read of the tenant configuration; `None` when the tenant
    /// has no config row.
    async fn find_by_company_id(&self, company_id: i64) -> Result<Option<CompanyConfig>, AppError>;
}
