//! Opaque keyset-pagination cursors. Which column a cursor compares against
//! tracks the `sort_field` the listing was run with, so resuming a `Name` or
//! `updatedAt` sort compares against the same column the `ORDER BY` uses.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use registry_error::RegistryError;
use uuid::Uuid;

use crate::filter::SortField;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A decoded pagination cursor: the sort column's value on the last row seen
/// by the caller, tie-broken by `id`. Encoded as base64 of
/// `"<tag>:<value>:<uuid>"`, where `tag` is `n`/`c`/`u` for
/// name/createdAt/updatedAt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    Name { value: String, id: Uuid },
    CreatedAt { value: DateTime<Utc>, id: Uuid },
    UpdatedAt { value: DateTime<Utc>, id: Uuid },
}

impl Cursor {
    /// Build the cursor for whichever column `sort_field` sorts by, from a
    /// row that carries all three candidate columns.
    pub fn for_sort_field(sort_field: SortField, name: &str, created_at: DateTime<Utc>, updated_at: DateTime<Utc>, id: Uuid) -> Self {
        match sort_field {
            SortField::Name => Cursor::Name { value: name.to_string(), id },
            SortField::CreatedAt => Cursor::CreatedAt { value: created_at, id },
            SortField::UpdatedAt => Cursor::UpdatedAt { value: updated_at, id },
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Cursor::Name { id, .. } | Cursor::CreatedAt { id, .. } | Cursor::UpdatedAt { id, .. } => *id,
        }
    }

    pub fn sort_field(&self) -> SortField {
        match self {
            Cursor::Name { .. } => SortField::Name,
            Cursor::CreatedAt { .. } => SortField::CreatedAt,
            Cursor::UpdatedAt { .. } => SortField::UpdatedAt,
        }
    }

    pub fn encode(&self) -> String {
        let raw = match self {
            Cursor::Name { value, id } => format!("n:{}:{}", STANDARD.encode(value), id),
            Cursor::CreatedAt { value, id } => format!("c:{}:{}", value.timestamp(), id),
            Cursor::UpdatedAt { value, id } => format!("u:{}:{}", value.timestamp(), id),
        };
        STANDARD.encode(raw)
    }

    pub fn decode(encoded: &str) -> Result<Self, RegistryError> {
        let raw = STANDARD
            .decode(encoded)
            .map_err(|_| RegistryError::invalid_input("cursor", "cursor is not valid base64"))?;
        let raw = String::from_utf8(raw).map_err(|_| RegistryError::invalid_input("cursor", "cursor is not valid utf-8"))?;

        let mut parts = raw.splitn(3, ':');
        let tag = parts.next().ok_or_else(|| RegistryError::invalid_input("cursor", "cursor is malformed"))?;
        let value = parts.next().ok_or_else(|| RegistryError::invalid_input("cursor", "cursor is malformed"))?;
        let id = parts.next().ok_or_else(|| RegistryError::invalid_input("cursor", "cursor is malformed"))?;
        let id = Uuid::parse_str(id).map_err(|_| RegistryError::invalid_input("cursor", "cursor id is malformed"))?;

        match tag {
            "n" => {
                let name = STANDARD.decode(value).map_err(|_| RegistryError::invalid_input("cursor", "cursor name is malformed"))?;
                let name = String::from_utf8(name).map_err(|_| RegistryError::invalid_input("cursor", "cursor name is not valid utf-8"))?;
                Ok(Cursor::Name { value: name, id })
            }
            "c" | "u" => {
                let seconds: i64 = value.parse().map_err(|_| RegistryError::invalid_input("cursor", "cursor timestamp is malformed"))?;
                let value = Utc
                    .timestamp_opt(seconds, 0)
                    .single()
                    .ok_or_else(|| RegistryError::invalid_input("cursor", "cursor timestamp is out of range"))?;
                if tag == "c" {
                    Ok(Cursor::CreatedAt { value, id })
                } else {
                    Ok(Cursor::UpdatedAt { value, id })
                }
            }
            _ => Err(RegistryError::invalid_input("cursor", "cursor is malformed")),
        }
    }
}

/// Clamp a caller-requested page size to `[1, MAX_PAGE_SIZE]`, substituting
/// [`DEFAULT_PAGE_SIZE`] for values `<= 0`.
pub fn clamp_page_size(requested: i64) -> u32 {
    if requested <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        (requested as u32).min(MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_cursor_round_trips() {
        let cursor = Cursor::CreatedAt { value: Utc.timestamp_opt(1_700_000_000, 0).unwrap(), id: Uuid::new_v4() };
        let encoded = cursor.encode();
        assert_eq!(Cursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn name_cursor_round_trips_with_special_characters() {
        let cursor = Cursor::Name { value: "Object:Type/Name".to_string(), id: Uuid::new_v4() };
        let encoded = cursor.encode();
        assert_eq!(Cursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn for_sort_field_picks_the_matching_column() {
        let id = Uuid::new_v4();
        let created_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let updated_at = Utc.timestamp_opt(1_700_000_100, 0).unwrap();

        let cursor = Cursor::for_sort_field(SortField::Name, "Widget", created_at, updated_at, id);
        assert_eq!(cursor, Cursor::Name { value: "Widget".to_string(), id });
        assert_eq!(cursor.sort_field(), SortField::Name);
    }

    #[test]
    fn invalid_base64_is_invalid_input() {
        let err = Cursor::decode("not valid base64!!").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { .. }));
    }

    #[test]
    fn page_size_clamping() {
        assert_eq!(clamp_page_size(0), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(-5), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(10), 10);
        assert_eq!(clamp_page_size(1000), MAX_PAGE_SIZE);
    }
}
