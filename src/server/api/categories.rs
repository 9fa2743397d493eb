use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::server::AppState;
use crate::server::dto::{CategoryView, CreateCategoryRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::types::NewCategory;

pub async fn list_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let categories = state
        .store
        .list_categories()
        .api_err("Failed to list categories")?;

    let views: Vec<CategoryView> = categories.into_iter().map(CategoryView::from).collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(views)))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    let category = state
        .store
        .create_category(&NewCategory::from(req))
        .api_err("Failed to create category")?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(CategoryView::from(category))),
    ))
}
