use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Check PostgreSQL database health.
///
/// Executes a `SELECT 1` round trip to verify the connection is usable.
/// Intended for readiness and liveness probes.
///
/// # Example
/// ```ignore
/// use database::postgres::check_health;
///
/// match check_health(&db).await {
///     Ok(_) => info!("database ready"),
///     Err(e) => warn!("database unavailable: {}", e),
/// }
/// ```
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt).await.map_err(|e| {
        DatabaseError::HealthCheckFailed(format!("PostgreSQL health check failed: {}", e))
    })?;

    debug!("PostgreSQL health check passed");
    Ok(())
}
