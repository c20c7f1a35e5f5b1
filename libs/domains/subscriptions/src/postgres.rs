use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    entity,
    error::{SubscriptionError, SubscriptionResult},
    models::{
        NewSubscription, PriceSumFilter, Subscription, SubscriptionFilter, UpdateSubscription,
    },
    repository::SubscriptionRepository,
};

pub struct PgSubscriptionRepository {
    db: DatabaseConnection,
}

impl PgSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a partial update onto an active model.
///
/// Present fields become `Set` columns so the generated UPDATE writes
/// exactly those; absent fields stay `NotSet` and keep their stored
/// value. `user_id` and `start_date` are immutable and never written.
fn change_set(id: i64, input: UpdateSubscription) -> entity::ActiveModel {
    entity::ActiveModel {
        id: Set(id),
        service_name: input.service_name.map_or(NotSet, Set),
        price: input.price.map_or(NotSet, Set),
        user_id: NotSet,
        start_date: NotSet,
        end_date: input.end_date.map_or(NotSet, Set),
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, input: NewSubscription) -> SubscriptionResult<Subscription> {
        let active_model: entity::ActiveModel = input.into();

        // INSERT .. RETURNING, so the stored row comes back in the same
        // round trip as the write
        let model = active_model.insert(&self.db).await?;

        tracing::info!(
            subscription_id = model.id,
            user_id = %model.user_id,
            "Created subscription"
        );
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> SubscriptionResult<Option<Subscription>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: SubscriptionFilter) -> SubscriptionResult<Vec<Subscription>> {
        let mut query = entity::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(entity::Column::UserId.eq(user_id));
        }

        let models = query
            .order_by_desc(entity::Column::StartDate)
            .limit(filter.limit.max(0) as u64)
            .offset(filter.offset.max(0) as u64)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: i64,
        input: UpdateSubscription,
    ) -> SubscriptionResult<Subscription> {
        if input.is_empty() {
            // Nothing to write; degrade to a read of the current row
            return self
                .get_by_id(id)
                .await?
                .ok_or(SubscriptionError::NotFound(id));
        }

        let model = change_set(id, input)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => SubscriptionError::NotFound(id),
                other => other.into(),
            })?;

        tracing::info!(subscription_id = id, "Updated subscription");
        Ok(model.into())
    }

    async fn sum_prices(&self, filter: PriceSumFilter) -> SubscriptionResult<i64> {
        let mut query = entity::Entity::find()
            .select_only()
            .column_as(entity::Column::Price.sum(), "total_price")
            .filter(entity::Column::StartDate.gte(filter.period_start));

        if let Some(user_id) = filter.user_id {
            query = query.filter(entity::Column::UserId.eq(user_id));
        }

        if let Some(service_name) = filter.service_name {
            query = query.filter(entity::Column::ServiceName.eq(service_name));
        }

        if let Some(period_end) = filter.period_end {
            // Still-active subscriptions stay in the total; a set end
            // date must fall inside the window
            query = query.filter(
                Condition::any()
                    .add(entity::Column::EndDate.is_null())
                    .add(entity::Column::EndDate.lte(period_end)),
            );
        }

        let total: Option<Option<i64>> = query.into_tuple().one(&self.db).await?;

        // SUM over an empty row set yields NULL, not zero
        Ok(total.flatten().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn month(year: i32, month: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn model(id: i64) -> entity::Model {
        entity::Model {
            id,
            service_name: "Netflix".to_string(),
            price: 500,
            user_id: Uuid::new_v4(),
            start_date: month(2024, 6),
            end_date: None,
        }
    }

    #[test]
    fn test_change_set_price_only_writes_only_price() {
        let active_model = change_set(
            3,
            UpdateSubscription {
                price: Some(250),
                ..Default::default()
            },
        );

        assert_eq!(active_model.price.clone().unwrap(), 250);
        assert!(active_model.service_name.is_not_set());
        assert!(active_model.end_date.is_not_set());
        assert!(active_model.user_id.is_not_set());
        assert!(active_model.start_date.is_not_set());
    }

    #[test]
    fn test_change_set_clears_end_date() {
        let active_model = change_set(
            3,
            UpdateSubscription {
                end_date: Some(None),
                ..Default::default()
            },
        );

        assert!(active_model.end_date.is_set());
        assert_eq!(active_model.end_date.clone().unwrap(), None);
        assert!(active_model.price.is_not_set());
    }

    #[test]
    fn test_change_set_sets_end_date() {
        let active_model = change_set(
            3,
            UpdateSubscription {
                end_date: Some(Some(month(2026, 1))),
                ..Default::default()
            },
        );

        assert_eq!(active_model.end_date.clone().unwrap(), Some(month(2026, 1)));
    }

    #[test]
    fn test_change_set_never_touches_immutable_columns() {
        let active_model = change_set(
            9,
            UpdateSubscription {
                service_name: Some("Spotify".to_string()),
                price: Some(300),
                end_date: Some(Some(month(2026, 1))),
            },
        );

        assert!(active_model.user_id.is_not_set());
        assert!(active_model.start_date.is_not_set());
    }

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let stored = model(1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();

        let repository = PgSubscriptionRepository::new(db);
        let created = repository
            .create(NewSubscription {
                service_name: stored.service_name.clone(),
                price: stored.price,
                user_id: stored.user_id,
                start_date: stored.start_date,
                end_date: None,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.price, 500);
        assert_eq!(created.user_id, stored.user_id);
    }

    #[tokio::test]
    async fn test_get_by_id_absent_row_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();

        let repository = PgSubscriptionRepository::new(db);
        let found = repository.get_by_id(42).await.unwrap();

        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_list_maps_rows_to_domain() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(2), model(1)]])
            .into_connection();

        let repository = PgSubscriptionRepository::new(db);
        let page = repository
            .list(SubscriptionFilter {
                user_id: None,
                limit: 20,
                offset: 0,
            })
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, 2);
        assert_eq!(page[1].id, 1);
    }

    #[tokio::test]
    async fn test_update_missing_row_maps_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();

        let repository = PgSubscriptionRepository::new(db);
        let result = repository
            .update(
                42,
                UpdateSubscription {
                    price: Some(100),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(SubscriptionError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_empty_update_reads_current_row() {
        let stored = model(3);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();

        let repository = PgSubscriptionRepository::new(db);
        let unchanged = repository
            .update(3, UpdateSubscription::default())
            .await
            .unwrap();

        assert_eq!(unchanged.id, 3);
        assert_eq!(unchanged.price, stored.price);
    }

    #[tokio::test]
    async fn test_sum_prices_returns_total() {
        let row = BTreeMap::from([("total_price", Value::BigInt(Some(150)))]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();

        let repository = PgSubscriptionRepository::new(db);
        let total = repository
            .sum_prices(PriceSumFilter {
                user_id: Some(Uuid::new_v4()),
                service_name: None,
                period_start: month(2024, 1),
                period_end: Some(month(2024, 3)),
            })
            .await
            .unwrap();

        assert_eq!(total, 150);
    }

    #[tokio::test]
    async fn test_sum_prices_empty_window_is_zero() {
        let row = BTreeMap::from([("total_price", Value::BigInt(None))]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();

        let repository = PgSubscriptionRepository::new(db);
        let total = repository
            .sum_prices(PriceSumFilter {
                user_id: None,
                service_name: None,
                period_start: month(2030, 1),
                period_end: None,
            })
            .await
            .unwrap();

        assert_eq!(total, 0);
    }
}
