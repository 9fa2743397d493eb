use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, ToSql, params};

use super::Store;
use super::schema::{DEFAULT_CATEGORIES, SCHEMA};
use super::{urls, validation};
use crate::error::{Error, Result};
use crate::types::*;

const COMMENT_SELECT: &str = "SELECT c.id, c.project_id, c.repository_id, c.location_id, c.content,
        l.discriminator, l.file_path, ll.line_number, lr.start_line_number, lr.end_line_number,
        a.id, a.username, a.created_at, a.updated_at,
        c.parent_comment_id, c.root_comment_id, c.depth
 FROM comments c
 JOIN locations l ON l.id = c.location_id
 LEFT JOIN line_locations ll ON ll.id = l.id
 LEFT JOIN line_range_locations lr ON lr.id = l.id
 LEFT JOIN activities a ON a.id = c.activity_id";

// Range comments sort by their first line.
const COMMENT_ORDER: &str =
    "ORDER BY l.file_path, COALESCE(ll.line_number, lr.start_line_number), c.id";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database. Its contents are discarded when the store is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Reads a timestamp column. A value in neither RFC 3339 nor SQLite's
/// `datetime('now')` format fails the row.
fn parse_datetime(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Trims an optional input, treating blank strings as absent.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A comment row before its location has been reassembled.
struct CommentRow {
    id: i64,
    project_id: i64,
    repository_id: i64,
    location_id: i64,
    content: String,
    discriminator: String,
    file_path: String,
    line_number: Option<u32>,
    start_line_number: Option<u32>,
    end_line_number: Option<u32>,
    activity: Option<Activity>,
    parent_comment_id: Option<i64>,
    root_comment_id: Option<i64>,
    depth: u32,
}

impl CommentRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let activity = match row.get::<_, Option<i64>>(10)? {
            Some(id) => Some(Activity {
                id,
                username: row.get(11)?,
                created_at: parse_datetime(row, 12)?,
                updated_at: parse_datetime(row, 13)?,
            }),
            None => None,
        };

        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            repository_id: row.get(2)?,
            location_id: row.get(3)?,
            content: row.get(4)?,
            discriminator: row.get(5)?,
            file_path: row.get(6)?,
            line_number: row.get(7)?,
            start_line_number: row.get(8)?,
            end_line_number: row.get(9)?,
            activity,
            parent_comment_id: row.get(14)?,
            root_comment_id: row.get(15)?,
            depth: row.get(16)?,
        })
    }

    fn into_comment(self, categories: Vec<Category>) -> Result<Comment> {
        let location = Location::from_columns(
            &self.discriminator,
            self.file_path,
            self.line_number,
            self.start_line_number,
            self.end_line_number,
        )?;

        Ok(Comment {
            id: self.id,
            project_id: self.project_id,
            repository_id: self.repository_id,
            location_id: self.location_id,
            location,
            content: self.content,
            parent_comment_id: self.parent_comment_id,
            root_comment_id: self.root_comment_id,
            depth: self.depth,
            categories,
            activity: self.activity,
        })
    }
}

fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        label: row.get(1)?,
        description: row.get(2)?,
    })
}

struct ProjectRow {
    id: i64,
    version: String,
    label: String,
    read_api_url: String,
    write_api_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl ProjectRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            version: row.get(1)?,
            label: row.get(2)?,
            read_api_url: row.get(3)?,
            write_api_url: row.get(4)?,
            created_at: parse_datetime(row, 5)?,
        })
    }

    fn into_project(self, repository: Option<Repository>, comments: Vec<Comment>) -> Project {
        Project {
            id: self.id,
            version: self.version,
            label: self.label,
            read_api_url: self.read_api_url,
            write_api_url: self.write_api_url,
            created_at: self.created_at,
            repository,
            comments,
        }
    }
}

struct RepositoryRow {
    id: i64,
    project_id: i64,
    repository_type: String,
    landing_page_url: String,
    commit: Option<String>,
    token: Option<String>,
}

impl RepositoryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            repository_type: row.get(2)?,
            landing_page_url: row.get(3)?,
            commit: row.get(4)?,
            token: row.get(5)?,
        })
    }

    fn into_repository(self) -> Result<Repository> {
        Ok(Repository {
            id: self.id,
            project_id: self.project_id,
            repository_type: RepositoryType::from_stored(&self.repository_type)?,
            landing_page_url: self.landing_page_url,
            commit: self.commit,
            token: self.token,
        })
    }
}

/// Loads comments matching `filter` (a condition on the `c` alias) with their
/// location, activity and categories, in display order.
fn query_comments(conn: &Connection, filter: &str, args: &[&dyn ToSql]) -> Result<Vec<Comment>> {
    let mut stmt = conn.prepare(&format!("{COMMENT_SELECT} WHERE {filter} {COMMENT_ORDER}"))?;
    let rows = stmt
        .query_map(args, CommentRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut categories = query_comment_categories(conn, filter, args)?;

    rows.into_iter()
        .map(|row| {
            let linked = categories.remove(&row.id).unwrap_or_default();
            row.into_comment(linked)
        })
        .collect()
}

fn query_comment_categories(
    conn: &Connection,
    filter: &str,
    args: &[&dyn ToSql],
) -> Result<HashMap<i64, Vec<Category>>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT cc.comment_id, cat.id, cat.label, cat.description
         FROM comment_categories cc
         JOIN categories cat ON cat.id = cc.category_id
         JOIN comments c ON c.id = cc.comment_id
         WHERE {filter}
         ORDER BY cat.label"
    ))?;

    let rows = stmt.query_map(args, |row| {
        Ok((
            row.get::<_, i64>(0)?,
            Category {
                id: row.get(1)?,
                label: row.get(2)?,
                description: row.get(3)?,
            },
        ))
    })?;

    let mut by_comment: HashMap<i64, Vec<Category>> = HashMap::new();
    for row in rows {
        let (comment_id, category) = row?;
        by_comment.entry(comment_id).or_default().push(category);
    }
    Ok(by_comment)
}

fn query_comment(conn: &Connection, project_id: i64, comment_id: i64) -> Result<Option<Comment>> {
    let mut comments = query_comments(
        conn,
        "c.project_id = ?1 AND c.id = ?2",
        &[&project_id, &comment_id],
    )?;
    Ok(comments.pop())
}

fn query_repository(conn: &Connection, project_id: i64) -> Result<Option<Repository>> {
    conn.query_row(
        "SELECT id, project_id, type, landing_page_url, commit_ref, token
         FROM repositories WHERE project_id = ?1",
        params![project_id],
        RepositoryRow::from_row,
    )
    .optional()?
    .map(RepositoryRow::into_repository)
    .transpose()
}

fn project_exists(conn: &Connection, project_id: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE id = ?1",
        params![project_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn ensure_categories_exist(conn: &Connection, category_ids: &[i64]) -> Result<()> {
    for category_id in category_ids {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE id = ?1",
            params![category_id],
            |row| row.get(0),
        )?;
        if count == 0 {
            return Err(Error::not_found(format!("category {category_id}")));
        }
    }
    Ok(())
}

fn link_categories(conn: &Connection, comment_id: i64, category_ids: &[i64]) -> Result<()> {
    for category_id in category_ids {
        conn.execute(
            "INSERT OR IGNORE INTO comment_categories (comment_id, category_id) VALUES (?1, ?2)",
            params![comment_id, category_id],
        )?;
    }
    Ok(())
}

fn insert_location(conn: &Connection, location: &Location) -> Result<i64> {
    conn.execute(
        "INSERT INTO locations (discriminator, file_path) VALUES (?1, ?2)",
        params![location.kind().as_str(), location.file_path()],
    )?;
    let location_id = conn.last_insert_rowid();

    match location {
        Location::Line { line_number, .. } => {
            conn.execute(
                "INSERT INTO line_locations (id, line_number) VALUES (?1, ?2)",
                params![location_id, line_number],
            )?;
        }
        Location::LineRange {
            start_line_number,
            end_line_number,
            ..
        } => {
            conn.execute(
                "INSERT INTO line_range_locations (id, start_line_number, end_line_number)
                 VALUES (?1, ?2, ?3)",
                params![location_id, start_line_number, end_line_number],
            )?;
        }
    }

    Ok(location_id)
}

/// Deletes activities no comment points at any more.
fn remove_unreferenced_activities(conn: &Connection) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM activities
         WHERE id NOT IN (SELECT activity_id FROM comments WHERE activity_id IS NOT NULL)",
        [],
    )?;
    Ok(removed)
}

fn insert_activity(conn: &Connection, username: &str, now: &DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO activities (username, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![username.trim(), format_datetime(now)],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA)?;
        for (label, description) in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT OR IGNORE INTO categories (label, description) VALUES (?1, ?2)",
                params![label, description],
            )?;
        }
        Ok(())
    }

    // Project operations

    fn create_project(&self, input: &NewProject, bases: &UrlBases) -> Result<Project> {
        validation::validate_repository_url(&input.repository_url)?;
        validation::validate_url_bases(bases)?;

        let repository_url = input.repository_url.trim();
        let label = non_blank(input.label.as_deref())
            .unwrap_or_else(|| urls::label_from_repository_url(repository_url));
        let repository_type = input.repository_type.unwrap_or_default();
        let commit = non_blank(input.commit.as_deref());
        let token = non_blank(input.token.as_deref());
        let created_at = Utc::now();

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // The URLs embed the project id, so the row is inserted first and
        // completed before the transaction becomes visible.
        tx.execute(
            "INSERT INTO projects (version, label, read_api_url, write_api_url, created_at)
             VALUES (?1, ?2, '', NULL, ?3)",
            params![DEFAULT_PROJECT_VERSION, label, format_datetime(&created_at)],
        )?;
        let project_id = tx.last_insert_rowid();

        let write_api_url = urls::write_api_url(&bases.backend_base_url, project_id);
        let read_api_url =
            urls::read_api_url(&bases.frontend_base_url, repository_url, &write_api_url);

        tx.execute(
            "UPDATE projects SET read_api_url = ?1, write_api_url = ?2 WHERE id = ?3",
            params![read_api_url, write_api_url, project_id],
        )?;

        tx.execute(
            "INSERT INTO repositories (project_id, type, landing_page_url, commit_ref, token)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                project_id,
                repository_type.as_str(),
                repository_url,
                commit,
                token,
            ],
        )?;
        let repository_id = tx.last_insert_rowid();

        tx.commit()?;

        tracing::info!(project_id, repository_url, "Created project");

        Ok(Project {
            id: project_id,
            version: DEFAULT_PROJECT_VERSION.to_string(),
            label,
            read_api_url,
            write_api_url: Some(write_api_url),
            created_at,
            repository: Some(Repository {
                id: repository_id,
                project_id,
                repository_type,
                landing_page_url: repository_url.to_string(),
                commit,
                token,
            }),
            comments: Vec::new(),
        })
    }

    fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let conn = self.conn();
        let Some(row) = conn
            .query_row(
                "SELECT id, version, label, read_api_url, write_api_url, created_at
                 FROM projects WHERE id = ?1",
                params![id],
                ProjectRow::from_row,
            )
            .optional()?
        else {
            return Ok(None);
        };

        let repository = query_repository(&conn, id)?;
        let comments = query_comments(&conn, "c.project_id = ?1", &[&id])?;

        Ok(Some(row.into_project(repository, comments)))
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn();

        let mut stmt = conn.prepare(
            "SELECT id, version, label, read_api_url, write_api_url, created_at
             FROM projects ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], ProjectRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT id, project_id, type, landing_page_url, commit_ref, token FROM repositories",
        )?;
        let mut repositories = HashMap::new();
        for row in stmt.query_map([], RepositoryRow::from_row)? {
            let repository = row?.into_repository()?;
            repositories.insert(repository.project_id, repository);
        }

        let mut comments: HashMap<i64, Vec<Comment>> = HashMap::new();
        for comment in query_comments(&conn, "1 = 1", &[])? {
            comments.entry(comment.project_id).or_default().push(comment);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let repository = repositories.remove(&row.id);
                let comments = comments.remove(&row.id).unwrap_or_default();
                row.into_project(repository, comments)
            })
            .collect())
    }

    fn delete_project(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // Removing the locations cascades to the comments that own them.
        tx.execute(
            "DELETE FROM locations WHERE id IN (SELECT location_id FROM comments WHERE project_id = ?1)",
            params![id],
        )?;
        let rows = tx.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        remove_unreferenced_activities(&tx)?;

        tx.commit()?;

        if rows > 0 {
            tracing::info!(project_id = id, "Deleted project");
        }
        Ok(rows > 0)
    }

    // Comment operations

    fn add_comment(&self, project_id: i64, input: &NewComment) -> Result<Comment> {
        validation::validate_new_comment(input)?;

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        if !project_exists(&tx, project_id)? {
            return Err(Error::not_found(format!("project {project_id}")));
        }

        let repository_id: i64 = tx
            .query_row(
                "SELECT id FROM repositories WHERE project_id = ?1",
                params![project_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::not_found(format!("repository of project {project_id}")))?;

        ensure_categories_exist(&tx, &input.category_ids)?;

        let location_id = insert_location(&tx, &input.location)?;

        let activity_id = match &input.username {
            Some(username) => Some(insert_activity(&tx, username, &Utc::now())?),
            None => None,
        };

        tx.execute(
            "INSERT INTO comments (project_id, repository_id, location_id, content, activity_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                project_id,
                repository_id,
                location_id,
                input.content,
                activity_id
            ],
        )?;
        let comment_id = tx.last_insert_rowid();

        link_categories(&tx, comment_id, &input.category_ids)?;

        let comment = query_comment(&tx, project_id, comment_id)?
            .ok_or_else(|| Error::not_found(format!("comment {comment_id}")))?;

        tx.commit()?;

        tracing::info!(
            project_id,
            comment_id,
            file_path = comment.location.file_path(),
            kind = %comment.location.kind(),
            "Created comment"
        );

        Ok(comment)
    }

    fn get_comment(&self, project_id: i64, comment_id: i64) -> Result<Option<Comment>> {
        let conn = self.conn();
        query_comment(&conn, project_id, comment_id)
    }

    fn add_reply(&self, project_id: i64, parent_id: i64, input: &NewReply) -> Result<Comment> {
        validation::validate_new_reply(input)?;

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let parent = query_comment(&tx, project_id, parent_id)?.ok_or_else(|| {
            Error::not_found(format!("comment {parent_id} in project {project_id}"))
        })?;

        ensure_categories_exist(&tx, &input.category_ids)?;

        // The reply gets its own copy of the parent's anchor.
        let location_id = insert_location(&tx, &parent.location)?;

        let activity_id = match &input.username {
            Some(username) => Some(insert_activity(&tx, username, &Utc::now())?),
            None => None,
        };

        tx.execute(
            "INSERT INTO comments (project_id, repository_id, location_id, content, activity_id,
                                   parent_comment_id, root_comment_id, depth)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                project_id,
                parent.repository_id,
                location_id,
                input.content,
                activity_id,
                parent.id,
                parent.thread_root_id(),
                parent.depth + 1
            ],
        )?;
        let comment_id = tx.last_insert_rowid();

        link_categories(&tx, comment_id, &input.category_ids)?;

        let comment = query_comment(&tx, project_id, comment_id)?
            .ok_or_else(|| Error::not_found(format!("comment {comment_id}")))?;

        tx.commit()?;

        tracing::info!(
            project_id,
            comment_id,
            parent_id,
            depth = comment.depth,
            "Created reply"
        );

        Ok(comment)
    }

    fn get_thread(&self, project_id: i64, comment_id: i64) -> Result<Vec<Comment>> {
        let conn = self.conn();

        let comment = query_comment(&conn, project_id, comment_id)?.ok_or_else(|| {
            Error::not_found(format!("comment {comment_id} in project {project_id}"))
        })?;
        let root_id = comment.thread_root_id();

        let mut thread = query_comments(
            &conn,
            "c.project_id = ?1 AND (c.id = ?2 OR c.root_comment_id = ?2)",
            &[&project_id, &root_id],
        )?;
        thread.sort_by_key(|c| c.id);
        Ok(thread)
    }

    fn list_comments(&self, project_id: i64) -> Result<Vec<Comment>> {
        let conn = self.conn();

        if !project_exists(&conn, project_id)? {
            return Err(Error::not_found(format!("project {project_id}")));
        }

        query_comments(&conn, "c.project_id = ?1", &[&project_id])
    }

    fn update_comment(
        &self,
        project_id: i64,
        comment_id: i64,
        update: &CommentUpdate,
    ) -> Result<Comment> {
        if let Some(content) = &update.content {
            validation::validate_content(content)?;
        }
        if let Some(username) = &update.username {
            validation::validate_username(username)?;
        }

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let activity_id: Option<i64> = tx
            .query_row(
                "SELECT activity_id FROM comments WHERE id = ?1 AND project_id = ?2",
                params![comment_id, project_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::not_found(format!("comment {comment_id}")))?;

        if let Some(content) = &update.content {
            tx.execute(
                "UPDATE comments SET content = ?1 WHERE id = ?2",
                params![content, comment_id],
            )?;
        }

        if let Some(category_ids) = &update.category_ids {
            ensure_categories_exist(&tx, category_ids)?;
            tx.execute(
                "DELETE FROM comment_categories WHERE comment_id = ?1",
                params![comment_id],
            )?;
            link_categories(&tx, comment_id, category_ids)?;
        }

        let now = Utc::now();
        match (activity_id, &update.username) {
            (Some(activity_id), _) => {
                tx.execute(
                    "UPDATE activities SET updated_at = ?1 WHERE id = ?2",
                    params![format_datetime(&now), activity_id],
                )?;
            }
            (None, Some(username)) => {
                let activity_id = insert_activity(&tx, username, &now)?;
                tx.execute(
                    "UPDATE comments SET activity_id = ?1 WHERE id = ?2",
                    params![activity_id, comment_id],
                )?;
            }
            (None, None) => {}
        }

        let comment = query_comment(&tx, project_id, comment_id)?
            .ok_or_else(|| Error::not_found(format!("comment {comment_id}")))?;

        tx.commit()?;

        tracing::info!(project_id, comment_id, "Updated comment");

        Ok(comment)
    }

    fn delete_comment(&self, project_id: i64, comment_id: i64) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let found = tx
            .query_row(
                "SELECT id FROM comments WHERE id = ?1 AND project_id = ?2",
                params![comment_id, project_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if found.is_none() {
            return Ok(false);
        }

        // Every reply below the comment goes with it. Removing the locations
        // cascades to the comments that own them.
        let location_ids = {
            let mut stmt = tx.prepare(
                "WITH RECURSIVE subtree(id) AS (
                     SELECT ?1
                     UNION ALL
                     SELECT c.id FROM comments c JOIN subtree s ON c.parent_comment_id = s.id
                 )
                 SELECT location_id FROM comments WHERE id IN (SELECT id FROM subtree)",
            )?;
            let ids = stmt
                .query_map(params![comment_id], |row| row.get::<_, i64>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            ids
        };
        for location_id in &location_ids {
            tx.execute("DELETE FROM locations WHERE id = ?1", params![location_id])?;
        }
        remove_unreferenced_activities(&tx)?;
        let removed = location_ids.len();

        tx.commit()?;

        tracing::info!(project_id, comment_id, removed, "Deleted comment");
        Ok(true)
    }

    // Category operations

    fn create_category(&self, input: &NewCategory) -> Result<Category> {
        validation::validate_category_label(&input.label)?;

        let label = input.label.trim().to_string();
        let description = non_blank(input.description.as_deref());

        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO categories (label, description) VALUES (?1, ?2)",
            params![label, description],
        );

        match result {
            Ok(_) => Ok(Category {
                id: conn.last_insert_rowid(),
                label,
                description,
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::validation(format!(
                    "Category '{label}' already exists"
                )))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_category_by_label(&self, label: &str) -> Result<Option<Category>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, label, description FROM categories WHERE label = ?1",
            params![label.trim()],
            category_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, label, description FROM categories ORDER BY id")?;

        let rows = stmt.query_map([], category_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_category(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
