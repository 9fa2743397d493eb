use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Discriminator persisted alongside every location row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Line,
    LineRange,
}

impl LocationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::LineRange => "line_range",
        }
    }

    /// Converts a stored discriminator back to its kind.
    pub fn parse(s: &str) -> Result<LocationKind> {
        match s {
            "line" => Ok(Self::Line),
            "line_range" => Ok(Self::LineRange),
            other => Err(Error::UnsupportedVariant(format!(
                "unknown location kind '{other}'"
            ))),
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anchor of a comment inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    Line {
        file_path: String,
        line_number: u32,
    },
    LineRange {
        file_path: String,
        start_line_number: u32,
        end_line_number: u32,
    },
}

impl Location {
    #[must_use]
    pub fn kind(&self) -> LocationKind {
        match self {
            Self::Line { .. } => LocationKind::Line,
            Self::LineRange { .. } => LocationKind::LineRange,
        }
    }

    #[must_use]
    pub fn file_path(&self) -> &str {
        match self {
            Self::Line { file_path, .. } | Self::LineRange { file_path, .. } => file_path,
        }
    }

    /// The line used for ordering and display: the line itself, or the first line of a range.
    #[must_use]
    pub fn line_number(&self) -> u32 {
        match self {
            Self::Line { line_number, .. } => *line_number,
            Self::LineRange {
                start_line_number, ..
            } => *start_line_number,
        }
    }

    #[must_use]
    pub fn end_line_number(&self) -> Option<u32> {
        match self {
            Self::Line { .. } => None,
            Self::LineRange {
                end_line_number, ..
            } => Some(*end_line_number),
        }
    }

    /// Rebuilds a location from its stored columns. The subtype columns that
    /// belong to `discriminator` must be present.
    pub fn from_columns(
        discriminator: &str,
        file_path: String,
        line_number: Option<u32>,
        start_line_number: Option<u32>,
        end_line_number: Option<u32>,
    ) -> Result<Location> {
        match LocationKind::parse(discriminator)? {
            LocationKind::Line => {
                let line_number = line_number.ok_or_else(|| {
                    Error::UnsupportedVariant(format!(
                        "line location for '{file_path}' has no line number"
                    ))
                })?;
                Ok(Self::Line {
                    file_path,
                    line_number,
                })
            }
            LocationKind::LineRange => match (start_line_number, end_line_number) {
                (Some(start_line_number), Some(end_line_number)) => Ok(Self::LineRange {
                    file_path,
                    start_line_number,
                    end_line_number,
                }),
                _ => Err(Error::UnsupportedVariant(format!(
                    "line range location for '{file_path}' has no range"
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(LocationKind::parse("line").unwrap(), LocationKind::Line);
        assert_eq!(
            LocationKind::parse("line_range").unwrap(),
            LocationKind::LineRange
        );
        assert!(matches!(
            LocationKind::parse("file"),
            Err(Error::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn test_from_columns_line() {
        let location =
            Location::from_columns("line", "src/main.rs".to_string(), Some(12), None, None)
                .unwrap();
        assert_eq!(location.kind(), LocationKind::Line);
        assert_eq!(location.file_path(), "src/main.rs");
        assert_eq!(location.line_number(), 12);
        assert_eq!(location.end_line_number(), None);
    }

    #[test]
    fn test_from_columns_line_range() {
        let location = Location::from_columns(
            "line_range",
            "src/lib.rs".to_string(),
            None,
            Some(3),
            Some(8),
        )
        .unwrap();
        assert_eq!(location.kind(), LocationKind::LineRange);
        assert_eq!(location.line_number(), 3);
        assert_eq!(location.end_line_number(), Some(8));
    }

    #[test]
    fn test_from_columns_missing_subtype_row() {
        let result = Location::from_columns("line_range", "a.py".to_string(), Some(1), None, None);
        assert!(matches!(result, Err(Error::UnsupportedVariant(_))));

        let result = Location::from_columns("line", "a.py".to_string(), None, Some(1), Some(2));
        assert!(matches!(result, Err(Error::UnsupportedVariant(_))));
    }

    #[test]
    fn test_serde_tagging() {
        let location: Location =
            serde_json::from_str(r#"{"kind":"line","file_path":"a.py","line_number":4}"#).unwrap();
        assert_eq!(
            location,
            Location::Line {
                file_path: "a.py".to_string(),
                line_number: 4
            }
        );

        let negative = serde_json::from_str::<Location>(
            r#"{"kind":"line","file_path":"a.py","line_number":-1}"#,
        );
        assert!(negative.is_err());
    }
}
