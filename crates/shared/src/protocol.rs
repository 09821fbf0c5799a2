use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BookId, PagingState, ReservationId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub user_id: UserId,
    pub book_id: BookId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReservationRequest {
    pub old_book_id: BookId,
    pub user_id: UserId,
    pub book_id: BookId,
}

/// Body of a successful create. Only `id` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedReservation {
    pub id: ReservationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub reserved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub user_id: UserId,
    pub book_id: BookId,
    #[serde(with = "timestamp")]
    pub reserved_at: DateTime<Utc>,
    /// Only the detail endpoint joins the book record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationPage {
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub next_paging_state: Option<PagingState>,
}

/// Failure body convention of the reservation service. `detail` is usually a
/// string but the framework's request validation emits a list of objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            serde_json::Value::Array(entries) => {
                let parts: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(serde_json::Value::as_str))
                    .collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        }
    }
}

/// The service writes naive timestamps (no offset); those are read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let Some(raw) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None);
            };
            parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
        }
    }
}
