//! PostgreSQL connectivity for the subscription services.
//!
//! Provides a configured SeaORM connector with startup retry, a health
//! check for readiness probes, and a migration runner.
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "subscriptions-api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
