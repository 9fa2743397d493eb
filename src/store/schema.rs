pub const SCHEMA: &str = r#"
-- One row per repository registration
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    version TEXT NOT NULL DEFAULT '1.0',
    label TEXT NOT NULL,
    read_api_url TEXT NOT NULL,
    write_api_url TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Source-control target of a project (1:1)
CREATE TABLE IF NOT EXISTS repositories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL UNIQUE REFERENCES projects(id) ON DELETE CASCADE,
    type TEXT NOT NULL DEFAULT 'git',
    landing_page_url TEXT NOT NULL CHECK (landing_page_url <> ''),
    commit_ref TEXT,
    token TEXT
);

-- Locations: one base row plus one subtype row, selected by discriminator
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    discriminator TEXT NOT NULL,
    file_path TEXT NOT NULL CHECK (file_path <> '')
);

CREATE TABLE IF NOT EXISTS line_locations (
    id INTEGER PRIMARY KEY REFERENCES locations(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL CHECK (line_number >= 0)
);

CREATE TABLE IF NOT EXISTS line_range_locations (
    id INTEGER PRIMARY KEY REFERENCES locations(id) ON DELETE CASCADE,
    start_line_number INTEGER NOT NULL CHECK (start_line_number >= 0),
    end_line_number INTEGER NOT NULL CHECK (end_line_number >= start_line_number)
);

-- Provenance of a comment
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Comments own their location exclusively (UNIQUE location_id).
-- Replies point at their parent and at the root of their thread.
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    repository_id INTEGER NOT NULL REFERENCES repositories(id) ON DELETE CASCADE,
    location_id INTEGER NOT NULL UNIQUE REFERENCES locations(id) ON DELETE CASCADE,
    content TEXT NOT NULL CHECK (content <> ''),
    activity_id INTEGER REFERENCES activities(id) ON DELETE SET NULL,
    parent_comment_id INTEGER REFERENCES comments(id) ON DELETE CASCADE,
    root_comment_id INTEGER REFERENCES comments(id) ON DELETE CASCADE,
    depth INTEGER NOT NULL DEFAULT 0 CHECK (depth >= 0),
    CHECK ((parent_comment_id IS NULL) = (root_comment_id IS NULL)),
    CHECK ((parent_comment_id IS NULL) = (depth = 0))
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    label TEXT NOT NULL UNIQUE,
    description TEXT
);

-- Many-to-many relationship between comments and categories
CREATE TABLE IF NOT EXISTS comment_categories (
    comment_id INTEGER NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    PRIMARY KEY (comment_id, category_id)
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_comments_project ON comments(project_id);
CREATE INDEX IF NOT EXISTS idx_comments_repository ON comments(repository_id);
CREATE INDEX IF NOT EXISTS idx_comments_parent ON comments(parent_comment_id);
CREATE INDEX IF NOT EXISTS idx_comments_root ON comments(root_comment_id);
CREATE INDEX IF NOT EXISTS idx_comment_categories_category ON comment_categories(category_id);
CREATE INDEX IF NOT EXISTS idx_locations_file_path ON locations(file_path);
"#;

/// Categories every fresh database starts with.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Uncategorized", "Default category"),
    ("Bug", "A bug in the code"),
    ("Feature Request", "A request for a new feature"),
    ("Documentation", "Issues related to documentation"),
    ("Question", "A question about the code or project"),
    ("Enhancement", "An enhancement to existing functionality"),
    ("Performance", "Performance-related issues or improvements"),
    ("Security", "Security vulnerabilities or concerns"),
];
