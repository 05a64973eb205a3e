//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use domain::{NewProduct, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store::{DEFAULT_PAGE_LIMIT, OrderStore, Page, ProductFilter, ProductStore};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    pub size: Vec<String>,
    pub available_quantity: i64,
}

#[derive(Deserialize)]
pub struct ListProductsQuery {
    pub name: Option<String>,
    pub size: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub size: Vec<String>,
    pub available_quantity: i64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            price: product.price,
            size: product.sizes.into_iter().collect(),
            available_quantity: product.available_quantity,
        }
    }
}

// -- Handlers --

/// POST /products — add a product to the catalog.
#[tracing::instrument(skip(state, req))]
pub async fn create<P: ProductStore + Clone + 'static, O: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<P, O>>>,
    req: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(req) = req.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let new = NewProduct::new(req.name, req.price, req.size, req.available_quantity)?;
    let product = state.products.create(new).await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /products — list catalog products with optional name/size filters.
#[tracing::instrument(skip(state, query))]
pub async fn list<P: ProductStore + Clone + 'static, O: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<P, O>>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let page = Page::new(
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        query.offset.unwrap_or(0),
    )?;

    let mut filter = ProductFilter::new();
    if let Some(name) = query.name {
        filter = filter.name(name);
    }
    if let Some(size) = query.size {
        filter = filter.size(size);
    }

    let products = state.products.list(&filter, page).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}
