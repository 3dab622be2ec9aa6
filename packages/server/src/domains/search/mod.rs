//! Search domain - incremental sync of published recipes into OpenSearch.
//!
//! ```text
//! SyncCursor (updated_at, id) ──► RecipeSearchRow::find_changed_since
//!                                     │
//!                    published? ──────┼──── no ──► BulkOperation::Delete
//!                        │ yes        │
//!                        ▼            ▼
//!                 RecipeDocument ──► BaseSearchIndex::bulk ──► cursor.advance + save
//! ```

pub mod document;
pub mod models;
pub mod sync;

pub use document::RecipeDocument;
pub use models::{RecipeSearchRow, SyncCursor};
pub use sync::{SearchSync, SyncStats, DEFAULT_SYNC_NAME};
