use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{
    Category, Comment, CommentUpdate, Location, NewCategory, NewComment, NewProject, NewReply,
    Project, RepositoryType,
};

#[derive(Debug, Default, Deserialize)]
pub struct SetupProjectRequest {
    #[serde(default, alias = "repoUrl", alias = "repository_url")]
    pub repo_url: String,
    #[serde(default, alias = "repoType")]
    pub repo_type: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl SetupProjectRequest {
    pub fn into_new_project(self) -> Result<NewProject> {
        let repository_type = match self.repo_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(RepositoryType::parse(&value.to_ascii_lowercase()).ok_or_else(
                || Error::Validation(format!("Unknown repository type '{value}'")),
            )?),
        };

        Ok(NewProject {
            repository_url: self.repo_url,
            repository_type,
            commit: self.commit,
            token: self.token,
            label: self.label,
        })
    }
}

/// A new comment. `line_number` alone anchors a single line; together with
/// `end_line_number` it anchors a range.
#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default, alias = "filePath")]
    pub file_path: String,
    #[serde(default, alias = "lineNumber")]
    pub line_number: Option<u32>,
    #[serde(default, alias = "startLineNumber")]
    pub start_line_number: Option<u32>,
    #[serde(default, alias = "endLineNumber")]
    pub end_line_number: Option<u32>,
    #[serde(default, alias = "content")]
    pub text: String,
    #[serde(default, alias = "category_ids")]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

impl AddCommentRequest {
    pub fn into_new_comment(self) -> Result<NewComment> {
        let location = match (
            self.line_number.or(self.start_line_number),
            self.end_line_number,
        ) {
            (Some(start_line_number), Some(end_line_number)) => Location::LineRange {
                file_path: self.file_path,
                start_line_number,
                end_line_number,
            },
            (Some(line_number), None) => Location::Line {
                file_path: self.file_path,
                line_number,
            },
            (None, _) => {
                return Err(Error::Validation(
                    "A line number or a line range is required".to_string(),
                ));
            }
        };

        Ok(NewComment {
            content: self.text,
            location,
            category_ids: self.categories,
            username: self.username,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddReplyRequest {
    #[serde(default, alias = "content")]
    pub text: String,
    #[serde(default, alias = "category_ids")]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

impl From<AddReplyRequest> for NewReply {
    fn from(req: AddReplyRequest) -> Self {
        Self {
            content: req.text,
            category_ids: req.categories,
            username: req.username,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default, alias = "content")]
    pub text: Option<String>,
    #[serde(default, alias = "category_ids")]
    pub categories: Option<Vec<i64>>,
    #[serde(default)]
    pub username: Option<String>,
}

impl From<UpdateCommentRequest> for CommentUpdate {
    fn from(req: UpdateCommentRequest) -> Self {
        Self {
            content: req.text,
            category_ids: req.categories,
            username: req.username,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(req: CreateCategoryRequest) -> Self {
        Self {
            label: req.label,
            description: req.description,
        }
    }
}

/// Flat view of a comment with its location folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub file_path: String,
    pub line_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line_number: Option<u32>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_comment_id: Option<i64>,
    #[serde(default)]
    pub depth: u32,
}

impl CommentView {
    /// The location this view was built from.
    #[must_use]
    pub fn location(&self) -> Location {
        match self.end_line_number {
            Some(end_line_number) => Location::LineRange {
                file_path: self.file_path.clone(),
                start_line_number: self.line_number,
                end_line_number,
            },
            None => Location::Line {
                file_path: self.file_path.clone(),
                line_number: self.line_number,
            },
        }
    }
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            file_path: comment.location.file_path().to_string(),
            line_number: comment.location.line_number(),
            end_line_number: comment.location.end_line_number(),
            text: comment.content.clone(),
            categories: comment
                .categories
                .iter()
                .map(|category| category.label.clone())
                .collect(),
            username: comment
                .activity
                .as_ref()
                .map(|activity| activity.username.clone()),
            parent_comment_id: comment.parent_comment_id,
            root_comment_id: comment.root_comment_id,
            depth: comment.depth,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryView {
    pub identifier: i64,
    #[serde(rename = "type")]
    pub repository_type: RepositoryType,
    pub landing_page_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub identifier: i64,
    pub version: String,
    pub label: String,
    pub read_api_url: String,
    pub write_api_url: Option<String>,
    pub repository: RepositoryView,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<CommentView>,
}

impl TryFrom<&Project> for ProjectView {
    type Error = Error;

    fn try_from(project: &Project) -> Result<Self> {
        let repository = project.repository.as_ref().ok_or_else(|| {
            Error::Validation(format!("Project {} has no repository", project.id))
        })?;

        if repository.landing_page_url.trim().is_empty() {
            return Err(Error::Validation(format!(
                "Repository of project {} has no URL",
                project.id
            )));
        }

        Ok(Self {
            identifier: project.id,
            version: project.version.clone(),
            label: project.label.clone(),
            read_api_url: project.read_api_url.clone(),
            write_api_url: project.write_api_url.clone(),
            repository: RepositoryView {
                identifier: repository.id,
                repository_type: repository.repository_type,
                landing_page_url: repository.landing_page_url.clone(),
                commit: repository.commit.clone(),
            },
            comments: project.comments.iter().map(CommentView::from).collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub identifier: i64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            identifier: category.id,
            label: category.label,
            description: category.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{Activity, Repository};

    fn comment(location: Location) -> Comment {
        Comment {
            id: 5,
            project_id: 1,
            repository_id: 1,
            location_id: 9,
            location,
            content: "check the bounds".to_string(),
            parent_comment_id: None,
            root_comment_id: None,
            depth: 0,
            categories: vec![Category {
                id: 2,
                label: "Bug".to_string(),
                description: None,
            }],
            activity: Some(Activity {
                id: 1,
                username: "alice".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }),
        }
    }

    fn project(repository: Option<Repository>) -> Project {
        Project {
            id: 3,
            version: "1.0".to_string(),
            label: "widgets".to_string(),
            read_api_url: "http://localhost:5173?repoUrl=x&commentsApiUrl=y".to_string(),
            write_api_url: Some("http://localhost:8080/api/comments/3".to_string()),
            created_at: Utc::now(),
            repository,
            comments: Vec::new(),
        }
    }

    fn repository(url: &str) -> Repository {
        Repository {
            id: 4,
            project_id: 3,
            repository_type: RepositoryType::Github,
            landing_page_url: url.to_string(),
            commit: None,
            token: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_comment_view_flattens_line_location() {
        let location = Location::Line {
            file_path: "src/lib.rs".to_string(),
            line_number: 17,
        };
        let view = CommentView::from(&comment(location.clone()));

        assert_eq!(view.file_path, "src/lib.rs");
        assert_eq!(view.line_number, 17);
        assert_eq!(view.end_line_number, None);
        assert_eq!(view.text, "check the bounds");
        assert_eq!(view.categories, vec!["Bug".to_string()]);
        assert_eq!(view.username.as_deref(), Some("alice"));
        assert_eq!(view.location(), location);
    }

    #[test]
    fn test_comment_view_round_trips_through_request() {
        let location = Location::LineRange {
            file_path: "src/lib.rs".to_string(),
            start_line_number: 4,
            end_line_number: 11,
        };
        let view = CommentView::from(&comment(location.clone()));
        assert_eq!(view.line_number, 4);

        let request = AddCommentRequest {
            file_path: view.file_path.clone(),
            line_number: Some(view.line_number),
            end_line_number: view.end_line_number,
            text: view.text.clone(),
            ..AddCommentRequest::default()
        };
        let new_comment = request.into_new_comment().unwrap();
        assert_eq!(new_comment.location, location);
        assert_eq!(new_comment.content, view.text);
    }

    #[test]
    fn test_add_comment_request_requires_a_line() {
        let request = AddCommentRequest {
            file_path: "a.py".to_string(),
            text: "hello".to_string(),
            ..AddCommentRequest::default()
        };
        assert!(matches!(
            request.into_new_comment(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_add_comment_request_accepts_camel_case() {
        let request: AddCommentRequest = serde_json::from_str(
            r#"{"filePath":"a.py","startLineNumber":2,"endLineNumber":6,"content":"hi"}"#,
        )
        .unwrap();
        let new_comment = request.into_new_comment().unwrap();
        assert_eq!(new_comment.location.end_line_number(), Some(6));
        assert_eq!(new_comment.content, "hi");
    }

    #[test]
    fn test_add_reply_request_accepts_content_alias() {
        let request: AddReplyRequest =
            serde_json::from_str(r#"{"content":"agreed","category_ids":[2],"username":"bob"}"#)
                .unwrap();
        let reply = NewReply::from(request);
        assert_eq!(reply.content, "agreed");
        assert_eq!(reply.category_ids, vec![2]);
        assert_eq!(reply.username.as_deref(), Some("bob"));
    }

    #[test]
    fn test_comment_view_carries_thread_position() {
        let mut reply = comment(Location::Line {
            file_path: "a.py".to_string(),
            line_number: 1,
        });
        reply.parent_comment_id = Some(3);
        reply.root_comment_id = Some(1);
        reply.depth = 2;

        let json = serde_json::to_value(CommentView::from(&reply)).unwrap();
        assert_eq!(json["parent_comment_id"], 3);
        assert_eq!(json["root_comment_id"], 1);
        assert_eq!(json["depth"], 2);
    }

    #[test]
    fn test_setup_request_repository_type() {
        let request: SetupProjectRequest =
            serde_json::from_str(r#"{"repoUrl":"https://a.b/c","repoType":"GitHub"}"#).unwrap();
        let input = request.into_new_project().unwrap();
        assert_eq!(input.repository_type, Some(RepositoryType::Github));

        let request: SetupProjectRequest =
            serde_json::from_str(r#"{"repo_url":"https://a.b/c","repo_type":"svn"}"#).unwrap();
        assert!(matches!(
            request.into_new_project(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_project_view() {
        let view = ProjectView::try_from(&project(Some(repository("https://a.b/c")))).unwrap();
        assert_eq!(view.identifier, 3);
        assert_eq!(view.repository.identifier, 4);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["repository"]["type"], "github");
        assert_eq!(json["repository"]["landing_page_url"], "https://a.b/c");
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn test_project_view_requires_repository() {
        assert!(matches!(
            ProjectView::try_from(&project(None)),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            ProjectView::try_from(&project(Some(repository("")))),
            Err(Error::Validation(_))
        ));
    }
}
