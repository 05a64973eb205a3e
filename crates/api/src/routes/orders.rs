//! Order placement and history endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::ProductId;
use domain::{Order, PlaceOrder};
use serde::{Deserialize, Serialize};
use store::{DEFAULT_PAGE_LIMIT, OrderStore, Page, ProductStore};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id,
            product_id: order.product_id.to_string(),
            quantity: order.quantity,
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /orders — place an order through the checkout workflow.
#[tracing::instrument(skip(state, req))]
pub async fn create<P: ProductStore + Clone + 'static, O: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<P, O>>>,
    req: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(req) = req.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let product_id = parse_product_id(&req.product_id)?;
    let cmd = PlaceOrder::new(req.user_id, product_id, req.quantity)?;
    let order = state.checkout.place_order(cmd).await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/:user_id — list a user's orders, newest first.
#[tracing::instrument(skip(state, query))]
pub async fn list_by_user<P: ProductStore + Clone + 'static, O: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<P, O>>>,
    Path(user_id): Path<String>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let page = Page::new(
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        query.offset.unwrap_or(0),
    )?;

    let orders = state.orders.list_by_user(&user_id, page).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid product_id: {e}")))?;
    Ok(ProductId::from(uuid))
}
