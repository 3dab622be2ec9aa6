//! Test harness with testcontainers for integration testing.
//!
//! Uses one shared Postgres container per test binary. The container and the
//! migrations are initialized on the first test, then reused.

use anyhow::{Context, Result};
use axum::Router;
use server_core::kernel::{ServerDeps, TestDependencies};
use server_core::server::{build_app, AppSettings};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::GraphQLClient;

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "rezeptbuch-test";
pub const TEST_INTERNAL_SECRET: &str = "test-internal-secret";

/// Shared test infrastructure that persists across all tests of a binary.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context: a fresh pool plus spy implementations of every
/// external service.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let deps = ctx.server_deps();
///     // ...
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub deps: TestDependencies,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        Self::with_dependencies(TestDependencies::new()).await
    }

    /// Harness with custom spies (e.g. failing analytics)
    pub async fn with_dependencies(deps: TestDependencies) -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { db_pool, deps })
    }

    pub fn server_deps(&self) -> ServerDeps {
        self.deps.server_deps(self.db_pool.clone())
    }

    /// Full HTTP router wired to the spies
    pub fn app(&self) -> Router {
        build_app(
            self.server_deps(),
            AppSettings {
                jwt_secret: TEST_JWT_SECRET.to_string(),
                jwt_issuer: TEST_JWT_ISSUER.to_string(),
                internal_api_secret: TEST_INTERNAL_SECRET.to_string(),
                allowed_origins: Vec::new(),
            },
        )
    }

    /// GraphQL client without a signed-in user
    pub fn graphql(&self) -> GraphQLClient {
        GraphQLClient::new(self.server_deps(), None)
    }

    /// GraphQL client acting as `user_id`
    pub fn graphql_as(&self, user_id: server_core::common::UserId) -> GraphQLClient {
        GraphQLClient::as_user(self.server_deps(), user_id)
    }
}
