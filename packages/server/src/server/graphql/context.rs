use juniper::{FieldError, FieldResult};
use sqlx::PgPool;
use std::sync::Arc;

use crate::common::AuthError;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Shared dependencies plus the per-request authenticated user
#[derive(Clone)]
pub struct GraphQLContext {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(server_deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self {
            db_pool: server_deps.db_pool.clone(),
            server_deps,
            auth_user,
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.server_deps
    }

    /// The signed-in user, or an `UNAUTHENTICATED` error
    pub fn require_user(&self) -> FieldResult<&AuthUser> {
        self.auth_user
            .as_ref()
            .ok_or_else(|| auth_field_error(AuthError::AuthenticationRequired))
    }
}

fn auth_field_error(e: AuthError) -> FieldError {
    let code = e.code();
    FieldError::new(e.to_string(), juniper::graphql_value!({ "code": code }))
}
