//! Selection of the storage backend behind the repository traits.

use std::sync::Arc;

use serde_json::json;
use sqlx::PgPool;

use crate::domain::repositories::{BoardRepository, CatalogLookup, ComponentRepository, OrderRepository};
use crate::error::AppError;
use crate::infrastructure::persistence::{
    MemoryStore, PgBoardRepository, PgCatalog, PgComponentRepository, PgOrderRepository,
};

#[derive(Clone)]
enum Backend {
    Memory,
    Postgres(Arc<PgPool>),
}

/// Repository handles for one backend, shared as trait objects.
#[derive(Clone)]
pub struct Storage {
    pub components: Arc<dyn ComponentRepository>,
    pub boards: Arc<dyn BoardRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub catalog: Arc<dyn CatalogLookup>,
    backend: Backend,
}

impl Storage {
    /// Every repository backed by one shared [`MemoryStore`].
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            components: store.clone(),
            boards: store.clone(),
            orders: store.clone(),
            catalog: store,
            backend: Backend::Memory,
        }
    }

    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            components: Arc::new(PgComponentRepository::new(pool.clone())),
            boards: Arc::new(PgBoardRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            catalog: Arc::new(PgCatalog::new(pool.clone())),
            backend: Backend::Postgres(pool),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory => "memory",
            Backend::Postgres(_) => "postgres",
        }
    }

    /// Round-trips to the backend.
    pub async fn ping(&self) -> Result<(), AppError> {
        match &self.backend {
            Backend::Memory => Ok(()),
            Backend::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool.as_ref()).await.map_err(|e| {
                    tracing::warn!(error = %e, "Database ping failed");
                    AppError::internal("Database unreachable", json!({}))
                })?;
                Ok(())
            }
        }
    }
}
