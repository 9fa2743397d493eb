//! Derivation of the URLs a project hands out to its clients.

/// Endpoint that accepts and lists the comments of a project.
#[must_use]
pub fn write_api_url(backend_base_url: &str, project_id: i64) -> String {
    format!(
        "{}/api/comments/{}",
        backend_base_url.trim().trim_end_matches('/'),
        project_id
    )
}

/// Viewer URL carrying the repository and comment endpoint as query parameters.
#[must_use]
pub fn read_api_url(frontend_base_url: &str, repository_url: &str, write_api_url: &str) -> String {
    let base = frontend_base_url.trim();
    let (base, separator) = if base.contains('?') {
        (base, '&')
    } else {
        (base.trim_end_matches('/'), '?')
    };
    format!(
        "{}{}repoUrl={}&commentsApiUrl={}",
        base,
        separator,
        urlencoding::encode(repository_url),
        urlencoding::encode(write_api_url)
    )
}

/// Human label for a repository: its last path segment without a `.git` suffix.
#[must_use]
pub fn label_from_repository_url(repository_url: &str) -> String {
    let trimmed = repository_url.trim().trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let label = last.strip_suffix(".git").unwrap_or(last);
    if label.is_empty() {
        trimmed.to_string()
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_api_url() {
        assert_eq!(
            write_api_url("http://localhost:8080", 7),
            "http://localhost:8080/api/comments/7"
        );
        assert_eq!(
            write_api_url("http://localhost:8080/", 7),
            "http://localhost:8080/api/comments/7"
        );
    }

    #[test]
    fn test_read_api_url_encodes_parameters() {
        let url = read_api_url(
            "http://localhost:5173",
            "https://github.com/acme/widgets",
            "http://localhost:8080/api/comments/3",
        );
        assert_eq!(
            url,
            "http://localhost:5173?repoUrl=https%3A%2F%2Fgithub.com%2Facme%2Fwidgets\
             &commentsApiUrl=http%3A%2F%2Flocalhost%3A8080%2Fapi%2Fcomments%2F3"
        );
    }

    #[test]
    fn test_read_api_url_trims_trailing_slash() {
        let url = read_api_url("http://localhost:5173/", "https://a.b/c", "http://x/y");
        assert!(url.starts_with("http://localhost:5173?repoUrl="));
    }

    #[test]
    fn test_read_api_url_appends_to_existing_query() {
        let url = read_api_url("http://viewer.local/?theme=dark", "https://a.b/c", "http://x/y");
        assert!(url.starts_with("http://viewer.local/?theme=dark&repoUrl="));
    }

    #[test]
    fn test_label_from_repository_url() {
        assert_eq!(
            label_from_repository_url("https://github.com/acme/widgets.git"),
            "widgets"
        );
        assert_eq!(
            label_from_repository_url("https://github.com/acme/widgets/"),
            "widgets"
        );
        assert_eq!(label_from_repository_url("https://example.com"), "example.com");
    }
}
