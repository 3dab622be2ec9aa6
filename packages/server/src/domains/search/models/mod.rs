pub mod search_row;
pub mod sync_cursor;

pub use search_row::RecipeSearchRow;
pub use sync_cursor::SyncCursor;
