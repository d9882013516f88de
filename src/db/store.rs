// src/db/store.rs
use crate::db::models::Certificate;
use crate::db::schema::certificates;
use crate::db::DbPool;
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::pooled_connection::deadpool::PoolError;
use diesel_async::RunQueryDsl;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to get database connection: {0}")]
    Pool(#[from] PoolError),

    #[error("database error: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Write-once certificate storage: one insert, one point lookup.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    async fn insert(&self, certificate: Certificate) -> Result<Uuid, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Certificate>, StoreError>;
}

pub struct PgCertificateStore {
    pool: DbPool,
}

impl PgCertificateStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CertificateStore for PgCertificateStore {
    async fn insert(&self, certificate: Certificate) -> Result<Uuid, StoreError> {
        let conn = &mut self.pool.get().await?;

        let id = diesel::insert_into(certificates::table)
            .values(&certificate)
            .returning(certificates::id)
            .get_result::<Uuid>(conn)
            .await?;

        log::info!("Stored certificate {} for playlist {}", id, certificate.playlist_id);
        Ok(id)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Certificate>, StoreError> {
        let conn = &mut self.pool.get().await?;

        let certificate = certificates::table
            .filter(certificates::id.eq(id))
            .select(Certificate::as_select())
            .first::<Certificate>(conn)
            .await
            .optional()?;

        Ok(certificate)
    }
}
