pub mod collection;
pub mod page_cursor;
pub mod row;
pub mod rows;
