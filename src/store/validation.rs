use url::Url;

use crate::error::{Error, Result};
use crate::types::{Location, NewComment, NewReply, UrlBases};

const MAX_FILE_PATH_LEN: usize = 4096;
const MAX_CATEGORY_LABEL_LEN: usize = 100;

/// Checks that a repository URL is present and parses as an absolute URL with a host.
pub fn validate_repository_url(url: &str) -> Result<()> {
    let url = url.trim();

    if url.is_empty() {
        return Err(Error::validation("Repository URL is required"));
    }

    let parsed = Url::parse(url)
        .map_err(|e| Error::validation(format!("Repository URL is malformed: {e}")))?;

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::validation("Repository URL must include a host"));
    }

    Ok(())
}

fn validate_base_url(url: &str, name: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::validation(format!("{name} base URL is required")));
    }

    Url::parse(url.trim())
        .map_err(|e| Error::validation(format!("{name} base URL is malformed: {e}")))?;

    Ok(())
}

pub fn validate_url_bases(bases: &UrlBases) -> Result<()> {
    validate_base_url(&bases.backend_base_url, "Backend")?;
    validate_base_url(&bases.frontend_base_url, "Frontend")
}

pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::validation("Comment content cannot be empty"));
    }
    Ok(())
}

pub fn validate_location(location: &Location) -> Result<()> {
    let file_path = location.file_path();

    if file_path.trim().is_empty() {
        return Err(Error::validation("File path cannot be empty"));
    }

    if file_path.len() > MAX_FILE_PATH_LEN {
        return Err(Error::validation(format!(
            "File path cannot exceed {MAX_FILE_PATH_LEN} characters"
        )));
    }

    const INVALID_CHARS: &[char] = &['\0', '\n', '\r'];
    if file_path.chars().any(|c| INVALID_CHARS.contains(&c)) {
        return Err(Error::validation("File path contains invalid characters"));
    }

    if let Location::LineRange {
        start_line_number,
        end_line_number,
        ..
    } = location
    {
        if start_line_number > end_line_number {
            return Err(Error::validation(format!(
                "Line range start ({start_line_number}) is after its end ({end_line_number})"
            )));
        }
    }

    Ok(())
}

pub fn validate_new_comment(input: &NewComment) -> Result<()> {
    validate_content(&input.content)?;
    validate_location(&input.location)?;
    if let Some(username) = &input.username {
        validate_username(username)?;
    }
    Ok(())
}

pub fn validate_new_reply(input: &NewReply) -> Result<()> {
    validate_content(&input.content)?;
    if let Some(username) = &input.username {
        validate_username(username)?;
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }
    Ok(())
}

pub fn validate_category_label(label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(Error::validation("Category label cannot be empty"));
    }
    if label.len() > MAX_CATEGORY_LABEL_LEN {
        return Err(Error::validation(format!(
            "Category label cannot exceed {MAX_CATEGORY_LABEL_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_repository_url() {
        assert!(validate_repository_url("https://github.com/acme/widgets").is_ok());
        assert!(validate_repository_url("ssh://git@example.com/acme/widgets.git").is_ok());

        assert!(matches!(
            validate_repository_url(""),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate_repository_url("   "),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate_repository_url("not a url"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate_repository_url("mailto:someone@example.com"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_validate_url_bases_requires_both() {
        let bases = UrlBases {
            backend_base_url: "http://localhost:8080".to_string(),
            frontend_base_url: String::new(),
        };
        assert!(matches!(
            validate_url_bases(&bases),
            Err(Error::Validation(_))
        ));

        let bases = UrlBases {
            backend_base_url: String::new(),
            frontend_base_url: "http://localhost:5173".to_string(),
        };
        assert!(matches!(
            validate_url_bases(&bases),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_validate_location_range_order() {
        let reversed = Location::LineRange {
            file_path: "a.py".to_string(),
            start_line_number: 9,
            end_line_number: 2,
        };
        assert!(matches!(
            validate_location(&reversed),
            Err(Error::Validation(_))
        ));

        let single_line_range = Location::LineRange {
            file_path: "a.py".to_string(),
            start_line_number: 4,
            end_line_number: 4,
        };
        assert!(validate_location(&single_line_range).is_ok());
    }

    #[test]
    fn test_validate_location_file_path() {
        let empty = Location::Line {
            file_path: " ".to_string(),
            line_number: 1,
        };
        assert!(validate_location(&empty).is_err());

        let newline = Location::Line {
            file_path: "a\nb.py".to_string(),
            line_number: 1,
        };
        assert!(validate_location(&newline).is_err());
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("looks good").is_ok());
        assert!(validate_content("").is_err());
        assert!(validate_content("\n\t ").is_err());
    }
}
