use anyhow::Context;

/// Environment-driven configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Session signing secret. Required; startup fails without it.
    pub jwt_secret: String,
    pub bind_addr: String,
    /// Add `Secure` to the session cookie (behind TLS in production).
    pub secure_cookies: bool,
    /// Use Postgres for the identity and people tables.
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        Ok(Self {
            jwt_secret,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            secure_cookies: env_flag("SECURE_COOKIES"),
            use_persistent_stores: env_flag("USE_PERSISTENT_STORES"),
            database_url: std::env::var("DATABASE_URL").ok(),
        })
    }
}
