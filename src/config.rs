use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP listener port (`SERVER_PORT`).
    pub server_port: u16,

    // =========================
    // Database configuration
    // =========================
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,

    /// Upper bound on pooled connections (`DB_MAX_OPEN_CONNS`).
    ///
    /// Connections are checked out for the lifetime of a reservation
    /// transaction, so this also bounds the number of in-flight
    /// reservations touching the database at once.
    pub db_max_open_conns: u32,

    /// Connections kept warm while idle (`DB_MAX_IDLE_CONNS`).
    pub db_max_idle_conns: u32,

    /// Recycle age for pooled connections (`DB_CONN_MAX_LIFETIME`, seconds).
    pub db_conn_max_lifetime: Duration,

    /// Log filter when `RUST_LOG` is unset (`LOG_LEVEL`).
    pub log_level: String,

    // =========================
    // Reservation tunables
    // =========================
    /// Deadline for a single reservation transaction (`TX_TIMEOUT_MS`).
    ///
    /// Bounds every suspension point inside an attempt: begin, contended
    /// lock-reads, and the final commit. On expiry the transaction is
    /// dropped (rolled back) and the request surfaces a fault.
    pub tx_timeout: Duration,

    /// Attempt budget for the deadlock retry loop (`MAX_RETRY_ATTEMPTS`).
    ///
    /// Only storage lock-wait/deadlock signals consume attempts; every
    /// other error surfaces immediately.
    pub max_retry_attempts: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server_port: env_parse("SERVER_PORT", 8080),

            db_host: env_or("DB_HOST", "localhost"),
            db_port: env_parse("DB_PORT", 3306),
            db_user: env_or("DB_USER", "root"),
            db_password: env_or("DB_PASSWORD", ""),
            db_name: env_or("DB_NAME", "stockade"),
            db_max_open_conns: env_parse("DB_MAX_OPEN_CONNS", 25),
            db_max_idle_conns: env_parse("DB_MAX_IDLE_CONNS", 5),
            db_conn_max_lifetime: Duration::from_secs(env_parse("DB_CONN_MAX_LIFETIME", 300)),

            log_level: env_or("LOG_LEVEL", "info"),

            tx_timeout: Duration::from_millis(env_parse("TX_TIMEOUT_MS", 5_000)),
            max_retry_attempts: env_parse("MAX_RETRY_ATTEMPTS", 3),
        }
    }

    /// Connection string for the sqlx MySQL driver.
    pub fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
        )
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
