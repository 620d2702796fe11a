use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use sqlx::mysql::MySqlRow;

use crate::company::repository::CompanyConfigRepository;
use crate::domain::CompanyConfig;
use crate::error::AppError;

/// SQLx-backed implementation of CompanyConfigRepository.
pub struct SqlxCompanyConfigRepository {
    pool: MySqlPool,
}

impl SqlxCompanyConfigRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyConfigRepository for SqlxCompanyConfigRepository {
    async fn find_by_company_id(&self, company_id: i64) -> Result<Option<CompanyConfig>, AppError> {
        let row = sqlx::query(
            r#"
SELECT id, companyId, fieldsOrderConfig, hasStock, createdAt, updatedAt
FROM CompanyConfig
WHERE companyId = ?;
"#,
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        match row {
            Some(r) => Ok(Some(row_to_company_config(&r)?)),
            None => Ok(None),
        }
    }
}

fn row_to_company_config(r: &MySqlRow) -> anyhow::Result<CompanyConfig> {
    Ok(CompanyConfig {
        id: r.try_get("id")?,
        company_id: r.try_get("companyId")?,
        fields_order_config: r.try_get("fieldsOrderConfig")?,
        has_stock: r.try_get("hasStock")?,
        created_at: r.try_get("createdAt")?,
        updated_at: r.try_get("updatedAt")?,
    })
}
