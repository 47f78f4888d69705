#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw cursors pointing at the pages around a [`Page`].
///
/// Each cursor is either absent or the integer transport form of a boundary
/// row's sort key, ready to be sent back as the cursor of a later request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PageCursors {
    /// Cursor of the page after this one, in the caller's order.
    pub next_cursor: Option<i64>,
    /// Cursor of the page before this one, in the caller's order.
    pub previous_cursor: Option<i64>,
}

impl PageCursors {
    /// Returns the cursors with next and previous exchanged.
    #[inline]
    pub fn swapped(self) -> Self {
        Self {
            next_cursor: self.previous_cursor,
            previous_cursor: self.next_cursor,
        }
    }
}

/// Result of a cursor-paginated query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items in this page, in the requested order.
    pub items: Vec<T>,
    /// Cursors of the neighbouring pages.
    pub cursors: PageCursors,
}

impl<T> Page<T> {
    /// Creates a page without pagination metadata.
    pub fn unpaged(items: Vec<T>) -> Self {
        Self {
            items,
            cursors: PageCursors::default(),
        }
    }

    /// Creates an empty page.
    pub fn empty() -> Self {
        Self::unpaged(Vec::new())
    }

    /// Returns the cursor of the following page, if there is one.
    #[inline]
    pub fn next_cursor(&self) -> Option<i64> {
        self.cursors.next_cursor
    }

    /// Returns the cursor of the preceding page, if there is one.
    #[inline]
    pub fn previous_cursor(&self) -> Option<i64> {
        self.cursors.previous_cursor
    }

    /// Returns true if there are more items after this page.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursors.next_cursor.is_some()
    }

    /// Returns true if there are items before this page.
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.cursors.previous_cursor.is_some()
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            cursors: self.cursors,
        }
    }

    /// Splits the page into its items and cursors.
    pub fn into_parts(self) -> (Vec<T>, PageCursors) {
        (self.items, self.cursors)
    }
}
