use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{SubscriptionError, SubscriptionResult};
use crate::models::{
    NewSubscription, PriceSumFilter, Subscription, SubscriptionFilter, UpdateSubscription,
};
use crate::repository::SubscriptionRepository;

/// Service layer for subscription business logic.
///
/// The sole entry point for external callers. Validation runs here,
/// before any store interaction, so every caller gets identical
/// guarantees; storage failures propagate unchanged.
#[derive(Clone)]
pub struct SubscriptionService<R: SubscriptionRepository> {
    repository: Arc<R>,
}

impl<R: SubscriptionRepository> SubscriptionService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new subscription with validation
    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn add_subscription(
        &self,
        input: NewSubscription,
    ) -> SubscriptionResult<Subscription> {
        input
            .validate()
            .map_err(|e| SubscriptionError::Validation(e.to_string()))?;

        if input.user_id.is_nil() {
            return Err(SubscriptionError::Validation(
                "user_id is required".to_string(),
            ));
        }

        self.repository.create(input).await
    }

    /// Get a subscription by ID
    #[instrument(skip(self), fields(subscription_id = id))]
    pub async fn get_subscription(&self, id: i64) -> SubscriptionResult<Subscription> {
        if id <= 0 {
            return Err(SubscriptionError::Validation(
                "invalid subscription id".to_string(),
            ));
        }

        self.repository
            .get_by_id(id)
            .await?
            .ok_or(SubscriptionError::NotFound(id))
    }

    /// List subscriptions with pagination defaults applied
    pub async fn list_subscriptions(
        &self,
        filter: SubscriptionFilter,
    ) -> SubscriptionResult<Vec<Subscription>> {
        self.repository.list(filter.normalized()).await
    }

    /// Apply a partial update; absent fields keep their stored value
    #[instrument(skip(self, input), fields(subscription_id = id))]
    pub async fn update_subscription(
        &self,
        id: i64,
        input: UpdateSubscription,
    ) -> SubscriptionResult<Subscription> {
        if id <= 0 {
            return Err(SubscriptionError::Validation(
                "invalid subscription id".to_string(),
            ));
        }

        input
            .validate()
            .map_err(|e| SubscriptionError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Sum subscription prices over a period, entirely store-side
    #[instrument(skip(self, filter), fields(period_start = %filter.period_start))]
    pub async fn sum_of_prices(&self, filter: PriceSumFilter) -> SubscriptionResult<i64> {
        self.repository.sum_prices(filter).await
    }
}
