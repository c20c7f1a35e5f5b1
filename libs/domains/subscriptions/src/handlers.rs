use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{SubscriptionError, SubscriptionResult};
use crate::models::{
    CreateSubscriptionRequest, ListSubscriptionsQuery, NewSubscription, PriceSumFilter,
    PriceSumResponse, SubscriptionResponse, SumSubscriptionPricesQuery, UpdateSubscription,
    UpdateSubscriptionRequest,
};
use crate::repository::SubscriptionRepository;
use crate::service::SubscriptionService;

/// OpenAPI documentation for the Subscriptions API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_subscriptions,
        get_subscription,
        create_subscription,
        update_subscription,
        sum_subscription_prices,
    ),
    components(
        schemas(
            SubscriptionResponse,
            CreateSubscriptionRequest,
            UpdateSubscriptionRequest,
            PriceSumResponse,
        )
    ),
    tags(
        (name = "subscriptions", description = "Subscription management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the subscriptions router
pub fn router<R: SubscriptionRepository + 'static>(service: SubscriptionService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_subscriptions::<R>).post(create_subscription::<R>),
        )
        .route("/sum", get(sum_subscription_prices::<R>))
        .route(
            "/{id}",
            get(get_subscription::<R>).patch(update_subscription::<R>),
        )
        .with_state(shared_service)
}

fn parse_id(raw: &str) -> SubscriptionResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| SubscriptionError::Validation("invalid subscription id".to_string()))
}

/// List subscriptions, optionally filtered by user
#[utoipa::path(
    get,
    path = "",
    tag = "subscriptions",
    params(ListSubscriptionsQuery),
    responses(
        (status = 200, description = "Page of subscriptions, most recent first", body = Vec<SubscriptionResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_subscriptions<R: SubscriptionRepository>(
    State(service): State<Arc<SubscriptionService<R>>>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> SubscriptionResult<Json<Vec<SubscriptionResponse>>> {
    let subscriptions = service.list_subscriptions(query.into()).await?;
    Ok(Json(subscriptions.into_iter().map(Into::into).collect()))
}

/// Get a subscription by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "subscriptions",
    params(
        ("id" = i64, Path, description = "Subscription ID")
    ),
    responses(
        (status = 200, description = "Subscription found", body = SubscriptionResponse),
        (status = 400, description = "Invalid subscription ID"),
        (status = 404, description = "Subscription not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_subscription<R: SubscriptionRepository>(
    State(service): State<Arc<SubscriptionService<R>>>,
    Path(id): Path<String>,
) -> SubscriptionResult<Json<SubscriptionResponse>> {
    let id = parse_id(&id)?;

    let subscription = service.get_subscription(id).await?;
    Ok(Json(subscription.into()))
}

/// Create a new subscription
#[utoipa::path(
    post,
    path = "",
    tag = "subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_subscription<R: SubscriptionRepository>(
    State(service): State<Arc<SubscriptionService<R>>>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> SubscriptionResult<impl IntoResponse> {
    let input: NewSubscription = request.try_into()?;

    let subscription = service.add_subscription(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::from(subscription)),
    ))
}

/// Partially update a subscription
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "subscriptions",
    params(
        ("id" = i64, Path, description = "Subscription ID")
    ),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated", body = SubscriptionResponse),
        (status = 400, description = "Invalid request or ID"),
        (status = 404, description = "Subscription not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_subscription<R: SubscriptionRepository>(
    State(service): State<Arc<SubscriptionService<R>>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> SubscriptionResult<Json<SubscriptionResponse>> {
    let id = parse_id(&id)?;
    let input: UpdateSubscription = request.try_into()?;

    let subscription = service.update_subscription(id, input).await?;
    Ok(Json(subscription.into()))
}

/// Sum subscription prices over a period
#[utoipa::path(
    get,
    path = "/sum",
    tag = "subscriptions",
    params(SumSubscriptionPricesQuery),
    responses(
        (status = 200, description = "Aggregated total", body = PriceSumResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn sum_subscription_prices<R: SubscriptionRepository>(
    State(service): State<Arc<SubscriptionService<R>>>,
    Query(query): Query<SumSubscriptionPricesQuery>,
) -> SubscriptionResult<Json<PriceSumResponse>> {
    let filter: PriceSumFilter = query.try_into()?;

    let total_price = service.sum_of_prices(filter).await?;
    Ok(Json(PriceSumResponse { total_price }))
}
