//! Subscription endpoints

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::error::ApiError;
use crate::extractors::SubscriptionIdPath;
use crate::server::AppState;
use crate::types::{
    AggregationResult, CreateSubscriptionBody, ListParams, SubscriptionResponse, SumParams,
    UpdateSubscriptionBody,
};

/// GET /subscriptions - filtered, paginated listing
async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<SubscriptionResponse>>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter()?;
    let subs = state.service.list(&filter).await?;

    Ok(Json(subs.into_iter().map(SubscriptionResponse::from).collect()))
}

/// POST /subscriptions - create a subscription
async fn create_subscription(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateSubscriptionBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    let Json(body) = body?;
    let sub = state.service.create(body.into_request()?).await?;

    Ok((StatusCode::CREATED, Json(SubscriptionResponse::from(sub))))
}

/// GET /subscriptions/sum - total price over matching subscriptions
async fn sum_subscriptions(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SumParams>, QueryRejection>,
) -> Result<Json<AggregationResult>, ApiError> {
    let Query(params) = params?;
    let total_cost = state.service.sum(&params.into_filter()?).await?;

    Ok(Json(AggregationResult { total_cost }))
}

/// GET /subscriptions/{id}
async fn get_subscription(
    State(state): State<Arc<AppState>>,
    id: SubscriptionIdPath,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    let sub = state.service.read(&id.as_id()).await?;
    Ok(Json(SubscriptionResponse::from(sub)))
}

/// PUT /subscriptions/{id} - replace mutable fields
async fn update_subscription(
    State(state): State<Arc<AppState>>,
    id: SubscriptionIdPath,
    body: Result<Json<UpdateSubscriptionBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    state.service.update(body.into_request(id.0)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /subscriptions/{id}
async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    id: SubscriptionIdPath,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&id.as_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Subscription routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route("/subscriptions/sum", get(sum_subscriptions))
        .route(
            "/subscriptions/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
}
