use driver::database::PostgresDatabase;
use kernel::KernelError;
use std::ops::Deref;
use std::sync::Arc;
use vodca::References;

/// Process wide state, built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppModule(Arc<Catalog>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let catalog = Catalog::connect().await?;
        tracing::info!("Book catalog store is ready");
        Ok(Self(Arc::new(catalog)))
    }
}

impl Deref for AppModule {
    type Target = Catalog;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Session factory for the books table. Every request opens its own
/// transaction from it.
#[derive(References)]
pub struct Catalog {
    database: PostgresDatabase,
}

impl Catalog {
    async fn connect() -> error_stack::Result<Self, KernelError> {
        let database = PostgresDatabase::new().await?;
        Ok(Self { database })
    }
}
