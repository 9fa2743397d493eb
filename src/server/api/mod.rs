mod categories;
mod comments;
mod projects;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Projects
        .route("/setup", post(projects::setup_project))
        .route("/projects", get(projects::list_projects))
        .route(
            "/projects/{id}",
            get(projects::get_project).delete(projects::delete_project),
        )
        // Comments, addressed by the project's write URL
        .route(
            "/comments/{project_id}",
            get(comments::list_comments)
                .post(comments::add_comment)
                .put(comments::add_comment),
        )
        .route(
            "/comments/{project_id}/{comment_id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route(
            "/comments/{project_id}/{comment_id}/replies",
            post(comments::add_reply),
        )
        .route(
            "/comments/{project_id}/{comment_id}/thread",
            get(comments::get_thread),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
}
