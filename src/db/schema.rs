use sqlx::MySqlPool;

pub async fn migrate(pool: &MySqlPool) -> anyhow::Result<()> {
    // Products
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS Product (
  id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
  external_id BIGINT NOT NULL DEFAULT 0,
  name VARCHAR(255) NOT NULL,
  description TEXT NOT NULL,
  price DOUBLE NOT NULL DEFAULT 0,
  stock BIGINT NULL,
  reserved_stock BIGINT NULL,
  companyId BIGINT NOT NULL,
  typeId BIGINT NOT NULL DEFAULT 0,
  category VARCHAR(255) NOT NULL DEFAULT '',
  isActive TINYINT(1) NOT NULL DEFAULT 1,
  isDeleted TINYINT(1) NOT NULL DEFAULT 0,
  hasStock TINYINT(1) NOT NULL DEFAULT 1,
  Stockeable TINYINT(1) NOT NULL DEFAULT 1,
  createdAt TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
  updatedAt TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  KEY idx_product_company (companyId)
);
"#,
    )
    .execute(pool)
    .await?;

    // Orders
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS Orders (
  id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
  companyId BIGINT NOT NULL,
  firstName VARCHAR(255) NOT NULL,
  lastName VARCHAR(255) NOT NULL,
  email VARCHAR(255) NOT NULL,
  phone VARCHAR(64) NULL,
  address VARCHAR(512) NULL,
  status VARCHAR(32) NOT NULL DEFAULT 'PENDING',
  totalPrice DOUBLE NOT NULL DEFAULT 0,
  createdAt TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
  updatedAt TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  KEY idx_orders_company (companyId)
);
"#,
    )
    .execute(pool)
    .await?;

    // Order items
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS OrderItems (
  id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
  orderId BIGINT UNSIGNED NOT NULL,
  productId BIGINT NOT NULL,
  quantity INT NOT NULL,
  price DOUBLE NOT NULL,
  createdAt TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
  KEY idx_order_items_order (orderId),
  CONSTRAINT fk_order_items_order
    FOREIGN KEY (orderId) REFERENCES Orders (id)
    ON DELETE CASCADE
);
"#,
    )
    .execute(pool)
    .await?;

    // Company config
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS CompanyConfig (
  id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
  companyId BIGINT NOT NULL,
  fieldsOrderConfig TEXT NOT NULL,
  hasStock TINYINT(1) NOT NULL DEFAULT 0,
  createdAt TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
  updatedAt TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  UNIQUE KEY uq_company_config_company (companyId)
);
"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
