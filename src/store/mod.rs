mod schema;
mod sqlite;
pub mod urls;
pub mod validation;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Every multi-row write runs as one transaction; on failure nothing is kept.
/// Reads return entities with their related rows already attached.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Project operations
    fn create_project(&self, input: &NewProject, bases: &UrlBases) -> Result<Project>;
    fn get_project(&self, id: i64) -> Result<Option<Project>>;
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn delete_project(&self, id: i64) -> Result<bool>;

    // Comment operations
    fn add_comment(&self, project_id: i64, input: &NewComment) -> Result<Comment>;
    fn get_comment(&self, project_id: i64, comment_id: i64) -> Result<Option<Comment>>;
    /// Replies to `parent_id`, anchored to a copy of the parent's location.
    fn add_reply(&self, project_id: i64, parent_id: i64, input: &NewReply) -> Result<Comment>;
    /// The whole thread containing `comment_id`, root first, in creation order.
    fn get_thread(&self, project_id: i64, comment_id: i64) -> Result<Vec<Comment>>;
    fn list_comments(&self, project_id: i64) -> Result<Vec<Comment>>;
    fn update_comment(
        &self,
        project_id: i64,
        comment_id: i64,
        update: &CommentUpdate,
    ) -> Result<Comment>;
    fn delete_comment(&self, project_id: i64, comment_id: i64) -> Result<bool>;

    // Category operations (many-to-many with comments)
    fn create_category(&self, input: &NewCategory) -> Result<Category>;
    fn get_category_by_label(&self, label: &str) -> Result<Option<Category>>;
    fn list_categories(&self) -> Result<Vec<Category>>;
    fn delete_category(&self, id: i64) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
