use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;
use crate::error::{Error, Result};

pub const DEFAULT_PROJECT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    #[default]
    Git,
    Github,
    Gitlab,
    Bitbucket,
}

impl RepositoryType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }

    pub fn parse(s: &str) -> Option<RepositoryType> {
        match s {
            "git" => Some(Self::Git),
            "github" => Some(Self::Github),
            "gitlab" => Some(Self::Gitlab),
            "bitbucket" => Some(Self::Bitbucket),
            _ => None,
        }
    }

    /// Like [`RepositoryType::parse`], for values read back from storage.
    pub fn from_stored(s: &str) -> Result<RepositoryType> {
        Self::parse(s)
            .ok_or_else(|| Error::UnsupportedVariant(format!("unknown repository type '{s}'")))
    }
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub version: String,
    pub label: String,
    pub read_api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_api_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub project_id: i64,
    #[serde(rename = "type")]
    pub repository_type: RepositoryType,
    pub landing_page_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Access credential for private repositories. Stored, never used.
    #[serde(skip)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub project_id: i64,
    pub repository_id: i64,
    pub location_id: i64,
    pub location: Location,
    pub content: String,
    /// Comment this one replies to. `None` for a thread root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_comment_id: Option<i64>,
    /// Distance from the thread root, which has depth 0.
    #[serde(default)]
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
}

impl Comment {
    /// Id of the first comment of this comment's thread.
    #[must_use]
    pub fn thread_root_id(&self) -> i64 {
        self.root_comment_id.unwrap_or(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a repository as a new project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub repository_url: String,
    pub repository_type: Option<RepositoryType>,
    pub commit: Option<String>,
    pub token: Option<String>,
    pub label: Option<String>,
}

/// Base URLs the read and write endpoints of a project are derived from.
#[derive(Debug, Clone, Default)]
pub struct UrlBases {
    pub backend_base_url: String,
    pub frontend_base_url: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub location: Location,
    pub category_ids: Vec<i64>,
    pub username: Option<String>,
}

/// A reply anchors to the same lines as the comment it answers.
#[derive(Debug, Clone, Default)]
pub struct NewReply {
    pub content: String,
    pub category_ids: Vec<i64>,
    pub username: Option<String>,
}

/// Partial update of a comment. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
    pub content: Option<String>,
    pub category_ids: Option<Vec<i64>>,
    pub username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub label: String,
    pub description: Option<String>,
}
