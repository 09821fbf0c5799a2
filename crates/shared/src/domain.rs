use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{is_valid_identifier, IdentifierField, ValidationError};

macro_rules! uuid_newtype {
    ($name:ident, $field:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Accepts only the hyphenated 8-4-4-4-12 form.
            pub fn parse(raw: &str) -> Result<Self, ValidationError> {
                if !is_valid_identifier(raw) {
                    return Err(ValidationError::new($field, raw));
                }
                Uuid::try_parse(raw)
                    .map(Self)
                    .map_err(|_| ValidationError::new($field, raw))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }
    };
}

uuid_newtype!(UserId, IdentifierField::UserId);
uuid_newtype!(BookId, IdentifierField::BookId);

/// Server-assigned reservation identifier, displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub String);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque pagination token handed out by the server. Never parsed or built
/// client-side; it is only echoed back on the next page request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PagingState(String);

impl PagingState {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PagingState {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PagingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
