use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::{AddCommentRequest, AddReplyRequest, CommentView, UpdateCommentRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::{CommentUpdate, NewReply};

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
) -> impl IntoResponse {
    let comments = state
        .store
        .list_comments(project_id)
        .api_err("Failed to list comments")?;

    let views: Vec<CommentView> = comments.iter().map(CommentView::from).collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(views)))
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
    Json(req): Json<AddCommentRequest>,
) -> impl IntoResponse {
    let input = req.into_new_comment().api_err("Invalid comment")?;

    let comment = state
        .store
        .add_comment(project_id, &input)
        .api_err("Failed to create comment")?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentView::from(&comment))),
    ))
}

pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    Path((project_id, comment_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let comment = state
        .store
        .get_comment(project_id, comment_id)
        .api_err("Failed to get comment")?
        .or_not_found("Comment not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(CommentView::from(&comment))))
}

pub async fn add_reply(
    State(state): State<Arc<AppState>>,
    Path((project_id, comment_id)): Path<(i64, i64)>,
    Json(req): Json<AddReplyRequest>,
) -> impl IntoResponse {
    let reply = state
        .store
        .add_reply(project_id, comment_id, &NewReply::from(req))
        .api_err("Failed to create reply")?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentView::from(&reply))),
    ))
}

pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path((project_id, comment_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let thread = state
        .store
        .get_thread(project_id, comment_id)
        .api_err("Failed to get thread")?;

    let views: Vec<CommentView> = thread.iter().map(CommentView::from).collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(views)))
}

pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path((project_id, comment_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateCommentRequest>,
) -> impl IntoResponse {
    let update = CommentUpdate::from(req);

    let comment = state
        .store
        .update_comment(project_id, comment_id, &update)
        .api_err("Failed to update comment")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(CommentView::from(&comment))))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path((project_id, comment_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_comment(project_id, comment_id)
        .api_err("Failed to delete comment")?;

    if !deleted {
        return Err(ApiError::not_found("Comment not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
