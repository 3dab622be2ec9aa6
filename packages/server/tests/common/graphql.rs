//! GraphQL client for integration testing.
//!
//! Executes GraphQL queries directly against the schema without HTTP overhead.

use juniper::Variables;
use serde_json::Value;
use server_core::common::UserId;
use server_core::kernel::ServerDeps;
use server_core::server::graphql::{create_schema, GraphQLContext, Schema};
use server_core::server::middleware::AuthUser;
use std::sync::Arc;

pub struct GraphQLClient {
    schema: Schema,
    context: GraphQLContext,
}

/// Result of a GraphQL execution.
#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    pub errors: Vec<String>,
    /// `extensions.code` of each error, in the same order
    pub codes: Vec<Option<String>>,
}

impl GraphQLResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// Gets a value at the given dotted path.
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = &current[key];
        }
        current.clone()
    }

    pub fn first_code(&self) -> Option<&str> {
        self.codes.first().and_then(|code| code.as_deref())
    }
}

impl GraphQLClient {
    pub fn new(server_deps: ServerDeps, auth_user: Option<AuthUser>) -> Self {
        Self {
            schema: create_schema(),
            context: GraphQLContext::new(Arc::new(server_deps), auth_user),
        }
    }

    pub fn as_user(server_deps: ServerDeps, user_id: UserId) -> Self {
        Self::new(
            server_deps,
            Some(AuthUser {
                user_id,
                email: format!("{}@test.local", user_id),
                is_admin: false,
            }),
        )
    }

    /// Execute a GraphQL query/mutation.
    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    /// Execute a query and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }

    /// Execute a query with variables and expect success.
    pub async fn query_with_vars(&self, query: &str, variables: Variables) -> Value {
        self.execute_with_vars(query, variables).await.unwrap()
    }

    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let result = juniper::execute(query, None, &self.schema, &variables, &self.context).await;

        match result {
            Ok((value, errors)) => {
                let data = serde_json::to_value(&value).ok();
                let codes = errors
                    .iter()
                    .map(|e| {
                        serde_json::to_value(e.error().extensions())
                            .ok()
                            .and_then(|ext| ext["code"].as_str().map(str::to_string))
                    })
                    .collect();
                let errors = errors.iter().map(|e| e.error().message().to_string()).collect();
                GraphQLResult { data, errors, codes }
            }
            Err(e) => GraphQLResult {
                data: None,
                errors: vec![format!("{:?}", e)],
                codes: vec![None],
            },
        }
    }
}
