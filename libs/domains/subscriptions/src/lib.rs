//! Subscriptions Domain
//!
//! Complete domain implementation for tracking recurring-service
//! subscriptions per user: create, fetch, partial update, paginated
//! listing, and store-side price aggregation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP boundary, MM-YYYY date codec
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation, normalization
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, params, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_subscriptions::{PgSubscriptionRepository, SubscriptionService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let repository = PgSubscriptionRepository::new(db);
//! let service = SubscriptionService::new(repository);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{SubscriptionError, SubscriptionResult};
pub use handlers::ApiDoc;
pub use models::{
    NewSubscription, PriceSumFilter, Subscription, SubscriptionFilter, SubscriptionResponse,
    UpdateSubscription,
};
pub use postgres::PgSubscriptionRepository;
pub use repository::SubscriptionRepository;
pub use service::SubscriptionService;
