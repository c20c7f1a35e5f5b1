use async_trait::async_trait;

use crate::error::SubscriptionResult;
use crate::models::{
    NewSubscription, PriceSumFilter, Subscription, SubscriptionFilter, UpdateSubscription,
};

/// Repository trait for Subscription persistence
///
/// Defines the data access interface for subscriptions. Every operation
/// is a single round trip to the store; optional filters are composed
/// as parameterized predicates by the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a new subscription and return the stored row
    async fn create(&self, input: NewSubscription) -> SubscriptionResult<Subscription>;

    /// Get a subscription by ID; absence is not an error here
    async fn get_by_id(&self, id: i64) -> SubscriptionResult<Option<Subscription>>;

    /// List subscriptions matching the filter, most recent start date first
    async fn list(&self, filter: SubscriptionFilter) -> SubscriptionResult<Vec<Subscription>>;

    /// Apply a partial update; only present fields are written
    async fn update(&self, id: i64, input: UpdateSubscription)
    -> SubscriptionResult<Subscription>;

    /// Store-side sum of prices over the filtered row set
    async fn sum_prices(&self, filter: PriceSumFilter) -> SubscriptionResult<i64>;
}
