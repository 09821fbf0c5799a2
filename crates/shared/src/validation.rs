use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const GROUP_LENGTHS: [usize; 5] = [8, 4, 4, 4, 12];

/// True iff `s` is a UUID in canonical 8-4-4-4-12 hex form. Either letter
/// case is accepted; braces, URNs and the unhyphenated form are not.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut groups = s.split('-');
    for expected in GROUP_LENGTHS {
        match groups.next() {
            Some(group) if group.len() == expected => {
                if !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return false;
                }
            }
            _ => return false,
        }
    }
    groups.next().is_none()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierField {
    UserId,
    BookId,
    OldBookId,
}

impl IdentifierField {
    pub fn label(self) -> &'static str {
        match self {
            Self::UserId => "User ID",
            Self::BookId => "Book ID",
            Self::OldBookId => "Original Book ID",
        }
    }
}

impl fmt::Display for IdentifierField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be a valid UUID (got {value:?})")]
pub struct ValidationError {
    pub field: IdentifierField,
    pub value: String,
}

impl ValidationError {
    pub fn new(field: IdentifierField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Re-tags the error, e.g. when a book id is parsed for the
    /// `old_book_id` slot of an update.
    pub fn for_field(mut self, field: IdentifierField) -> Self {
        self.field = field;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_uuid() {
        assert!(is_valid_identifier("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
        assert!(is_valid_identifier("3FA85F64-5717-4562-B3FC-2C963F66AFA6"));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        assert!(!is_valid_identifier("not-a-uuid"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("3fa85f64-5717-4562-b3fc-2c963f66afa"));
        let near_miss = "3fa85f64-5717-4562-b3fc2c963f66";
        assert_eq!(near_miss.len(), 31);
        assert!(!is_valid_identifier(near_miss));
    }

    #[test]
    fn rejects_extra_groups_and_non_hex() {
        assert!(!is_valid_identifier("3fa85f64-5717-4562-b3fc-2c963f66afa6-00"));
        assert!(!is_valid_identifier("3fa85f64-5717-4562-b3fc-2c963f66afg6"));
        assert!(!is_valid_identifier("{3fa85f64-5717-4562-b3fc-2c963f66afa6}"));
        assert!(!is_valid_identifier(" 3fa85f64-5717-4562-b3fc-2c963f66afa6"));
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = ValidationError::new(IdentifierField::BookId, "abc");
        assert_eq!(err.to_string(), "Book ID must be a valid UUID (got \"abc\")");
        let err = err.for_field(IdentifierField::OldBookId);
        assert_eq!(err.field, IdentifierField::OldBookId);
    }
}
