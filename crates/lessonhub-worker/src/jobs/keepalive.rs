//! Datastore keep-alive ping.

use sqlx::PgPool;
use tracing::{trace, warn};

/// Ping the database so idle deployments keep their connection pool warm.
pub async fn run(pool: &PgPool) {
    match lessonhub_database::connection::health_check(pool).await {
        Ok(true) => trace!("Keep-alive ping ok"),
        Ok(false) => warn!("Keep-alive ping returned unexpected result"),
        Err(e) => warn!(error = %e, "Keep-alive ping failed"),
    }
}
