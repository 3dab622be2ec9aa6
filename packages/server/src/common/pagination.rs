//! Relay-style cursor pagination for newest-first lists.
//!
//! Cursors are base64-encoded v7 ids. Because v7 ids are time-ordered, "older
//! than the cursor" is simply `id < cursor` and no timestamp needs encoding.

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use juniper::GraphQLObject;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i32 = 20;
const MAX_PAGE_SIZE: i32 = 100;

/// Opaque cursor for pagination (base64-encoded UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(Uuid);

impl Cursor {
    pub fn new(id: Uuid) -> Self {
        Cursor(id)
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.as_bytes())
    }

    pub fn decode(s: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .context("Invalid cursor: not valid base64")?;
        let uuid = Uuid::from_slice(&bytes).context("Invalid cursor: not a valid UUID")?;
        Ok(Cursor(uuid))
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

/// Page information (Relay subset for forward pagination).
#[derive(Debug, Clone, Default, GraphQLObject)]
#[graphql(description = "Information about pagination in a connection")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Raw `first`/`after` arguments as received from GraphQL.
#[derive(Debug, Clone, Default)]
pub struct PaginationArgs {
    pub first: Option<i32>,
    pub after: Option<String>,
}

/// Validated and normalized pagination arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPaginationArgs {
    /// Number of items to return (1-100, default 20).
    pub limit: i32,
    pub cursor: Option<Uuid>,
}

impl PaginationArgs {
    pub fn validate(&self) -> Result<ValidatedPaginationArgs, &'static str> {
        let limit = self.first.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let cursor = self
            .after
            .as_deref()
            .map(Cursor::decode)
            .transpose()
            .map_err(|_| "Invalid cursor")?
            .map(Cursor::into_uuid);

        Ok(ValidatedPaginationArgs { limit, cursor })
    }
}

impl ValidatedPaginationArgs {
    /// SQL LIMIT value (limit + 1 to detect has_next_page).
    pub fn fetch_limit(&self) -> i64 {
        (self.limit + 1) as i64
    }
}

/// Trim a `limit + 1` result set and report whether more items exist.
pub fn trim_results<T>(mut results: Vec<T>, limit: i32) -> (Vec<T>, bool) {
    let has_more = results.len() > limit as usize;
    results.truncate(limit as usize);
    (results, has_more)
}

/// Build the page info for a trimmed page.
pub fn build_page_info(has_more: bool, last_id: Option<Uuid>) -> PageInfo {
    PageInfo {
        has_next_page: has_more,
        end_cursor: last_id.map(|id| Cursor::new(id).encode()),
    }
}
