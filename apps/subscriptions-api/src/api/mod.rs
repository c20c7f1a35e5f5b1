//! API routes module

pub mod health;

use axum::Router;
use domain_subscriptions::{handlers, PgSubscriptionRepository, SubscriptionService};

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    let repository = PgSubscriptionRepository::new(state.db.clone());
    let service = SubscriptionService::new(repository);

    Router::new().nest("/subscriptions", handlers::router(service))
}
