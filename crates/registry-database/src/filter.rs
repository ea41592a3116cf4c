//! Filter and sort parameters shared by the ObjectType/LinkType list queries.

use crate::cursor::{clamp_page_size, Cursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn as_column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Parameters for a paginated `ObjectType`/`LinkType` listing.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub include_deleted: bool,
    pub created_after: Option<chrono::DateTime<chrono::Utc>>,
    pub created_before: Option<chrono::DateTime<chrono::Utc>>,
    pub cursor: Option<Cursor>,
    pub page_size: u32,
    pub sort_field: Option<SortField>,
    pub sort_direction: SortDirection,
}

impl ListFilter {
    pub fn new(requested_page_size: i64) -> Self {
        Self {
            page_size: clamp_page_size(requested_page_size),
            sort_direction: SortDirection::Desc,
            ..Default::default()
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_page_size() {
        let filter = ListFilter::new(0);
        assert_eq!(filter.page_size, crate::cursor::DEFAULT_PAGE_SIZE);

        let filter = ListFilter::new(5000);
        assert_eq!(filter.page_size, crate::cursor::MAX_PAGE_SIZE);
    }
}
