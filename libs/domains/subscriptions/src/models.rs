use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::SubscriptionError;

/// Wire format for dates: month and year only, e.g. "07-2025".
pub const MONTH_YEAR_FORMAT: &str = "%m-%Y";

/// Default page size applied when a list request supplies no usable limit.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Decode a "MM-YYYY" wire date into the stored timestamp.
///
/// The wire format carries no day, so the day is pinned to the first of
/// the month at midnight. Returns `None` for anything that is not a
/// valid month/year pair.
pub fn parse_month_year(value: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(&format!("01-{value}"), "%d-%m-%Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Encode a stored timestamp as its "MM-YYYY" wire form.
///
/// Lossy by design: the stored day of month (and time) is dropped, so a
/// decode/encode round trip preserves month and year only.
pub fn format_month_year(value: &NaiveDateTime) -> String {
    value.format(MONTH_YEAR_FORMAT).to_string()
}

/// Subscription entity - a user's recurring-service record
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    /// Store-assigned identity, immutable after creation
    pub id: i64,
    /// Name of the subscribed service
    pub service_name: String,
    /// Monthly price in whole currency units
    pub price: i32,
    /// Owning user, immutable after creation
    pub user_id: Uuid,
    /// When the subscription started (full timestamp stored, month+year exposed)
    pub start_date: NaiveDateTime,
    /// When the subscription ended; `None` means still active
    pub end_date: Option<NaiveDateTime>,
}

/// Parameters for creating a subscription (the id is store-assigned)
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewSubscription {
    #[validate(length(min = 1, message = "service name is required"))]
    pub service_name: String,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
}

/// Parameters for a partial update.
///
/// Every field is tri-state: `None` leaves the stored value unchanged,
/// `Some(..)` writes it. For `end_date` the inner option distinguishes
/// setting a new date (`Some(Some(date))`) from explicitly clearing it
/// (`Some(None)`). `user_id` and `start_date` are immutable and have no
/// update field.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateSubscription {
    #[validate(length(min = 1, message = "service name is required"))]
    pub service_name: Option<String>,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: Option<i32>,
    pub end_date: Option<Option<NaiveDateTime>>,
}

impl UpdateSubscription {
    /// True when no field is present, i.e. the update writes nothing.
    pub fn is_empty(&self) -> bool {
        self.service_name.is_none() && self.price.is_none() && self.end_date.is_none()
    }
}

/// Query filters for listing subscriptions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionFilter {
    pub user_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

impl SubscriptionFilter {
    /// Apply pagination defaults: a limit of zero or less becomes
    /// [`DEFAULT_PAGE_SIZE`], a negative offset becomes zero.
    pub fn normalized(self) -> Self {
        Self {
            user_id: self.user_id,
            limit: if self.limit <= 0 {
                DEFAULT_PAGE_SIZE
            } else {
                self.limit
            },
            offset: self.offset.max(0),
        }
    }
}

/// Filters for the price aggregation window.
///
/// `period_end` is optional; when absent the window is open-ended and
/// only `start_date >= period_start` bounds the row set.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSumFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub period_start: NaiveDateTime,
    pub period_end: Option<NaiveDateTime>,
}

/// DTO for creating a subscription
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    /// Subscription start as "MM-YYYY"
    #[schema(example = "07-2025")]
    pub start_date: String,
    /// Optional subscription end as "MM-YYYY"
    pub end_date: Option<String>,
}

impl TryFrom<CreateSubscriptionRequest> for NewSubscription {
    type Error = SubscriptionError;

    fn try_from(request: CreateSubscriptionRequest) -> Result<Self, Self::Error> {
        let start_date = parse_month_year(&request.start_date)
            .ok_or_else(|| invalid_month("start_date", &request.start_date))?;

        let end_date = match &request.end_date {
            Some(raw) => Some(parse_month_year(raw).ok_or_else(|| invalid_month("end_date", raw))?),
            None => None,
        };

        Ok(Self {
            service_name: request.service_name,
            price: request.price,
            user_id: request.user_id,
            start_date,
            end_date,
        })
    }
}

/// Deserialize a field so that a present key always produces `Some`,
/// even when its value is `null`. Combined with `#[serde(default)]`,
/// an absent key stays `None` and `null` becomes `Some(None)`.
fn tri_state<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// DTO for a partial update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    pub service_name: Option<String>,
    pub price: Option<i32>,
    /// "MM-YYYY"; an explicit `null` clears the end date, an absent key
    /// leaves it unchanged
    #[serde(default, deserialize_with = "tri_state")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<String>>,
}

impl TryFrom<UpdateSubscriptionRequest> for UpdateSubscription {
    type Error = SubscriptionError;

    fn try_from(request: UpdateSubscriptionRequest) -> Result<Self, Self::Error> {
        let end_date = match request.end_date {
            Some(Some(raw)) => Some(Some(
                parse_month_year(&raw).ok_or_else(|| invalid_month("end_date", &raw))?,
            )),
            Some(None) => Some(None),
            None => None,
        };

        Ok(Self {
            service_name: request.service_name,
            price: request.price,
            end_date,
        })
    }
}

/// Query parameters for listing subscriptions
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListSubscriptionsQuery {
    /// Restrict the page to one user
    pub user_id: Option<Uuid>,
    /// Page size; values of zero or less fall back to the default of 20
    pub limit: Option<i64>,
    /// Rows to skip; negative values fall back to zero
    pub offset: Option<i64>,
}

impl From<ListSubscriptionsQuery> for SubscriptionFilter {
    fn from(query: ListSubscriptionsQuery) -> Self {
        Self {
            user_id: query.user_id,
            limit: query.limit.unwrap_or(0),
            offset: query.offset.unwrap_or(0),
        }
    }
}

/// Query parameters for the price aggregation
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SumSubscriptionPricesQuery {
    /// Restrict the total to one user
    pub user_id: Option<Uuid>,
    /// Restrict the total to one service
    pub service_name: Option<String>,
    /// Start of the aggregation window as "MM-YYYY" (required)
    pub period_start: String,
    /// End of the window as "MM-YYYY"; open-ended when omitted
    pub period_end: Option<String>,
}

impl TryFrom<SumSubscriptionPricesQuery> for PriceSumFilter {
    type Error = SubscriptionError;

    fn try_from(query: SumSubscriptionPricesQuery) -> Result<Self, Self::Error> {
        let period_start = parse_month_year(&query.period_start)
            .ok_or_else(|| invalid_month("period_start", &query.period_start))?;

        let period_end = match &query.period_end {
            Some(raw) => {
                Some(parse_month_year(raw).ok_or_else(|| invalid_month("period_end", raw))?)
            }
            None => None,
        };

        Ok(Self {
            user_id: query.user_id,
            service_name: query.service_name,
            period_start,
            period_end,
        })
    }
}

/// DTO for subscription responses; dates carry month and year only
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    /// "MM-YYYY"
    pub start_date: String,
    /// "MM-YYYY"
    pub end_date: Option<String>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            service_name: subscription.service_name,
            price: subscription.price,
            user_id: subscription.user_id,
            start_date: format_month_year(&subscription.start_date),
            end_date: subscription.end_date.as_ref().map(format_month_year),
        }
    }
}

/// DTO for the aggregation response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriceSumResponse {
    pub total_price: i64,
}

fn invalid_month(field: &str, value: &str) -> SubscriptionError {
    SubscriptionError::Validation(format!(
        "invalid {} '{}', expected MM-YYYY",
        field, value
    ))
}
