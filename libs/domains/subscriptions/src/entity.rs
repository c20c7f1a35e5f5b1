use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// SeaORM entity for the subscriptions table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: DateTime,
    pub end_date: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from SeaORM Model to domain Subscription
impl From<Model> for crate::models::Subscription {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            service_name: model.service_name,
            price: model.price,
            user_id: model.user_id,
            start_date: model.start_date,
            end_date: model.end_date,
        }
    }
}

// Conversion from domain NewSubscription to SeaORM ActiveModel
impl From<crate::models::NewSubscription> for ActiveModel {
    fn from(input: crate::models::NewSubscription) -> Self {
        ActiveModel {
            id: NotSet, // store-assigned identity
            service_name: Set(input.service_name),
            price: Set(input.price),
            user_id: Set(input.user_id),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewSubscription;
    use chrono::NaiveDate;

    #[test]
    fn test_new_subscription_leaves_id_unset() {
        let input = NewSubscription {
            service_name: "Netflix".to_string(),
            price: 500,
            user_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            end_date: None,
        };

        let active_model: ActiveModel = input.into();
        assert!(active_model.id.is_not_set());
        assert!(active_model.service_name.is_set());
        assert!(active_model.end_date.is_set());
    }
}
