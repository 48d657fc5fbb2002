//! Service wiring: repositories + session codec behind one `Arc`.

use std::sync::Arc;

use anyhow::Context;

use campuserp_auth::SessionCodec;
use campuserp_infra::{
    AcademicsRepo, BillingRepo, IdentityRepo, InMemoryStore, PeopleRepo, PostgresIdentityStore,
    PostgresPeopleStore,
};

use super::config::AppConfig;

pub struct AppServices {
    pub codec: Arc<SessionCodec>,
    pub identity: Arc<dyn IdentityRepo>,
    pub people: Arc<dyn PeopleRepo>,
    pub academics: Arc<dyn AcademicsRepo>,
    pub billing: Arc<dyn BillingRepo>,
    pub secure_cookies: bool,
}

impl AppServices {
    /// Everything in memory; what tests and local development run on.
    pub fn in_memory(codec: SessionCodec) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            codec: Arc::new(codec),
            identity: store.clone(),
            people: store.clone(),
            academics: store.clone(),
            billing: store,
            secure_cookies: false,
        }
    }
}

/// Build services per configuration.
///
/// With `USE_PERSISTENT_STORES` the identity and people tables move to
/// Postgres; academics and billing stay in memory.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let codec = Arc::new(
        SessionCodec::new(&config.jwt_secret).context("session codec configuration")?,
    );
    let store = Arc::new(InMemoryStore::new());

    if !config.use_persistent_stores {
        return Ok(AppServices {
            codec,
            identity: store.clone(),
            people: store.clone(),
            academics: store.clone(),
            billing: store,
            secure_cookies: config.secure_cookies,
        });
    }

    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set when USE_PERSISTENT_STORES is enabled")?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("connecting to postgres")?;

    let identity = PostgresIdentityStore::new(pool.clone());
    identity
        .ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("users schema: {e}"))?;
    let people = PostgresPeopleStore::new(pool);
    people
        .ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("people schema: {e}"))?;

    tracing::info!("persistent identity/people stores enabled");

    Ok(AppServices {
        codec,
        identity: Arc::new(identity),
        people: Arc::new(people),
        academics: store.clone(),
        billing: store,
        secure_cookies: config.secure_cookies,
    })
}
