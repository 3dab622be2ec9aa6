use thiserror::Error;

/// Authorization errors for the Rezeptbuch API
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,
}

impl AuthError {
    /// Stable `extensions.code` for GraphQL clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AuthenticationRequired => "UNAUTHENTICATED",
        }
    }
}
