//! Value types shared by the paginator and the range query executors.

mod cursor;
mod direction;
mod field;
mod mode;
mod operator;

pub use cursor::Cursor;
pub use direction::{Direction, SortOrder};
pub use field::FieldName;
pub use mode::CursorMode;
pub use operator::Operator;
