use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::product::dto::{ProductDto, SearchProductsRequest, SearchProductsResponse};
use crate::product::repository::ProductRepository;

/// Seam the HTTP layer depends on.
#[async_trait]
pub trait SearchProducts: Send + Sync {
    async fn search(
        &self,
        req: SearchProductsRequest,
    ) -> Result<SearchProductsResponse, AppError>;
}

pub struct SearchProductsUseCase {
    products: Arc<dyn ProductRepository>,
}

impl SearchProductsUseCase {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl SearchProducts for SearchProductsUseCase {
    async fn search(
        &self,
        req: SearchProductsRequest,
    ) -> Result<SearchProductsResponse, AppError> {
        let found = self
            .products
            .find_by_ids_and_company(&req.product_ids, req.company_id)
            .await?;

        let found_ids: HashSet<i64> = found.iter().map(|p| p.id).collect();
        let not_found = req
            .product_ids
            .iter()
            .copied()
            .filter(|id| !found_ids.contains(id))
            .collect();

        Ok(SearchProductsResponse {
            products: found.iter().map(ProductDto::from).collect(),
            not_found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::Product;

    struct StaticProductRepo {
        products: Vec<Product>,
    }

    #[async_trait]
    impl ProductRepository for StaticProductRepo {
        async fn find_by_ids_and_company(
            &self,
            ids: &[i64],
            company_id: i64,
        ) -> Result<Vec<Product>, AppError> {
            Ok(self
                .products
                .iter()
                .filter(|p| ids.contains(&p.id) && p.company_id == company_id && !p.is_deleted)
                .cloned()
                .collect())
        }
    }

    fn mk_product(id: i64, company_id: i64, stock: i64, reserved: i64) -> Product {
        Product {
            id,
            external_id: id,
            name: format!("product-{id}"),
            description: String::new(),
            price: 10.0,
            stock: Some(stock),
            reserved_stock: Some(reserved),
            company_id,
            type_id: 0,
            category: "general".into(),
            is_active: true,
            is_deleted: false,
            has_stock: true,
            stockeable: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn search_partitions_found_and_missing_ids() {
        let uc = SearchProductsUseCase::new(Arc::new(StaticProductRepo {
            products: vec![mk_product(5, 7, 100, 30), mk_product(9, 7, 50, 50)],
        }));

        let resp = uc
            .search(SearchProductsRequest {
                company_id: 7,
                product_ids: vec![5, 9, 999],
            })
            .await
            .unwrap();

        assert_eq!(resp.products.len(), 2);
        assert_eq!(resp.not_found, vec![999]);
        assert_eq!(resp.products[0].available_stock, 70);
        assert_eq!(resp.products[1].available_stock, 0);
    }

    #[tokio::test]
    async fn search_is_tenant_scoped() {
        let uc = SearchProductsUseCase::new(Arc::new(StaticProductRepo {
            products: vec![mk_product(5, 7, 100, 0)],
        }));

        let resp = uc
            .search(SearchProductsRequest {
                company_id: 8,
                product_ids: vec![5],
            })
            .await
            .unwrap();

        assert!(resp.products.is_empty());
        assert_eq!(resp.not_found, vec![5]);
    }
}
