use chrono::{DateTime, Utc};

/// Order lifecycle. Orders are created elsewhere in `Pending`; the
/// reservation engine moves them to `Created` exactly once. `Canceled` is
/// never produced here but exists in storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Created,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Created => "CREATED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CREATED" => Ok(OrderStatus::Created),
            "CANCELED" => Ok(OrderStatus::Canceled),
            other => Err(anyhow::anyhow!("unknown order status: {other}")),
        }
    }
}

/// A product row. `stock`/`reserved_stock` are nullable in storage:
/// a NULL on either side means the product has no usable availability.
#[derive(Clone, Debug)]
pub struct Product {
    pub id: i64,
    pub external_id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: Option<i64>,
    pub reserved_stock: Option<i64>,
    pub company_id: i64,
    pub type_id: i64,
    pub category: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub has_stock: bool,
    pub stockeable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Stock not yet claimed by a reservation, clamped at zero.
    pub fn available_stock(&self) -> i64 {
        match (self.stock, self.reserved_stock) {
            (Some(stock), Some(reserved)) => (stock - reserved).max(0),
            _ => 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Order {
    pub id: u64,
    pub company_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: OrderStatus,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only child of an order; persisted iff its line was reserved.
#[derive(Clone, Debug)]
pub struct OrderItem {
    pub order_id: u64,
    pub product_id: i64,
    pub quantity: i32,
    pub price: f64,
}

/// Per-tenant configuration. `has_stock` is informational for the
/// reservation flow: the per-product flags are the binding gates.
#[derive(Clone, Debug)]
pub struct CompanyConfig {
    pub id: i64,
    pub company_id: i64,
    pub fields_order_config: String,
    pub has_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn mk_product(stock: Option<i64>, reserved: Option<i64>) -> Product {
        Product {
            id: 1,
            external_id: 1,
            name: "widget".into(),
            description: String::new(),
            price: 10.0,
            stock,
            reserved_stock: reserved,
            company_id: 1,
            type_id: 0,
            category: String::new(),
            is_active: true,
            is_deleted: false,
            has_stock: true,
            stockeable: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn available_is_stock_minus_reserved() {
        let p = mk_product(Some(100), Some(30));
        assert_eq!(p.available_stock(), 70);
    }

    #[test]
    fn available_clamps_to_zero_when_overreserved() {
        // reserved > stock should not happen in healthy state, but the
        // derived quantity must never go negative.
        let p = mk_product(Some(10), Some(25));
        assert_eq!(p.available_stock(), 0);
    }

    #[test]
    fn available_is_zero_when_either_side_is_null() {
        assert_eq!(mk_product(None, Some(5)).available_stock(), 0);
        assert_eq!(mk_product(Some(5), None).available_stock(), 0);
        assert_eq!(mk_product(None, None).available_stock(), 0);
    }

    #[test]
    fn available_is_zero_when_fully_reserved() {
        let p = mk_product(Some(50), Some(50));
        assert_eq!(p.available_stock(), 0);
    }

    #[test]
    fn order_status_round_trips_through_storage_form() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Created,
            OrderStatus::Canceled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(OrderStatus::from_str("SHIPPED").is_err());
    }
}
