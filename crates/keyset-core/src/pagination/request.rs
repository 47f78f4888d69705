#[cfg(feature = "config")]
use clap::Args;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::DEFAULT_LIMIT;
use crate::types::{Direction, SortOrder};

/// Transport form of a page request.
///
/// Enum fields only accept their transport names (`"asc"`, `"desc"`,
/// `"next"`, `"back"`); anything else fails to deserialize. The cursor mode
/// and sort field are chosen by the server, see
/// [`Paginator::from_request`].
///
/// [`Paginator::from_request`]: crate::Paginator::from_request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PageRequest {
    /// Sort order of the collection.
    #[serde(default)]
    #[cfg_attr(
        feature = "config",
        arg(long = "page-order", env = "PAGE_ORDER", default_value = "desc")
    )]
    pub order: SortOrder,

    /// Traversal direction relative to the cursor.
    #[serde(default)]
    #[cfg_attr(
        feature = "config",
        arg(long = "page-direction", env = "PAGE_DIRECTION", default_value = "next")
    )]
    pub direction: Direction,

    /// Maximum number of rows to return; `0` disables pagination.
    #[serde(default = "default_limit")]
    #[cfg_attr(
        feature = "config",
        arg(long = "page-limit", env = "PAGE_LIMIT", default_value = "50")
    )]
    pub limit: u32,

    /// Raw cursor returned by a previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "config", arg(long = "page-cursor", env = "PAGE_CURSOR"))]
    pub cursor: Option<i64>,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl PageRequest {
    /// Creates a request for the first page.
    pub fn new(limit: u32) -> Self {
        Self {
            order: SortOrder::default(),
            direction: Direction::default(),
            limit,
            cursor: None,
        }
    }

    /// Sets the sort order.
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the traversal direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Continues from the given raw cursor.
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = Some(cursor);
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_with_defaults() {
        let request: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.limit, DEFAULT_LIMIT);
        assert_eq!(request.order, SortOrder::Descending);
        assert_eq!(request.direction, Direction::Next);
    }

    #[test]
    fn deserialize_full_request() {
        let request: PageRequest = serde_json::from_str(
            r#"{ "order": "asc", "direction": "back", "limit": 3, "cursor": 8 }"#,
        )
        .unwrap();

        assert_eq!(
            request,
            PageRequest::new(3)
                .with_order(SortOrder::Ascending)
                .with_direction(Direction::Back)
                .with_cursor(8)
        );
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        assert!(serde_json::from_str::<PageRequest>(r#"{ "order": "up" }"#).is_err());
        assert!(serde_json::from_str::<PageRequest>(r#"{ "direction": "" }"#).is_err());
        assert!(serde_json::from_str::<PageRequest>(r#"{ "limit": -1 }"#).is_err());
    }
}
