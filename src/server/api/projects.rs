use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::{ProjectView, SetupProjectRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::Project;

fn render(project: &Project) -> Result<ProjectView, ApiError> {
    ProjectView::try_from(project).map_err(|e| {
        tracing::error!("Inconsistent project {}: {e}", project.id);
        ApiError::internal("Failed to render project")
    })
}

pub async fn setup_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetupProjectRequest>,
) -> impl IntoResponse {
    let input = req.into_new_project().api_err("Invalid project setup")?;

    let project = state
        .store
        .create_project(&input, &state.url_bases)
        .api_err("Failed to create project")?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(render(&project)?)),
    ))
}

pub async fn list_projects(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let projects = state
        .store
        .list_projects()
        .api_err("Failed to list projects")?;

    let views = projects
        .iter()
        .map(render)
        .collect::<Result<Vec<_>, _>>()?;

    Ok::<_, ApiError>(Json(ApiResponse::success(views)))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let project = state
        .store
        .get_project(id)
        .api_err("Failed to get project")?
        .or_not_found("Project not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(render(&project)?)))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_project(id)
        .api_err("Failed to delete project")?;

    if !deleted {
        return Err(ApiError::not_found("Project not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
