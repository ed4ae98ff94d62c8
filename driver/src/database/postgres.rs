use std::ops::{Deref, DerefMut};
use std::time::Duration;

use error_stack::ResultExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::book::*;

mod book;

static DATABASE_URL: &str = "DATABASE_URL";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Session factory for PostgreSQL.
///
/// Connections are never reused: each [`DatabaseConnection::transact`] opens a new one,
/// which is closed once its transaction is committed or rolled back. This keeps the
/// service usable against serverless databases that drop idle connections.
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(DATABASE_URL)?;
        Self::connect(&url).await
    }

    pub async fn connect(url: &str) -> error_stack::Result<Self, KernelError> {
        let pool = PgPoolOptions::new()
            .min_connections(0)
            .acquire_timeout(CONNECT_TIMEOUT)
            .test_before_acquire(true)
            .after_release(|_, _| Box::pin(async move { Ok(false) }))
            .connect(url)
            .await
            .convert_error()
            .attach_printable("Failed to connect to PostgreSQL")?;

        let mut con = pool.acquire().await.convert_error()?;
        PgBookInternal::create_table(&mut con).await?;
        tracing::info!("PostgreSQL schema ready");

        Ok(Self { pool })
    }
}

pub struct PostgresConnection(sqlx::Transaction<'static, Postgres>);

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresConnection;
    async fn transact(&self) -> error_stack::Result<PostgresConnection, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresConnection(transaction))
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresConnection {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}
