use crate::config::Config;
use crate::error::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::info;

// 스키마 적용 시 다른 프로세스와의 충돌 방지용 advisory lock 키
const SCHEMA_LOCK_KEY: i64 = 0x5A1E_17E3;

pub struct DatabaseManager {
    pub pool: Arc<PgPool>,
}

impl DatabaseManager {
    /// 데이터베이스 매니저 생성
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// 기존 풀로 생성
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// 데이터베이스 풀 가져오기
    pub fn get_pool(&self) -> Arc<PgPool> {
        Arc::clone(&self.pool)
    }

    /// 트랜잭션 실행
    pub async fn transaction<F, R, E>(&self, f: F) -> std::result::Result<R, E>
    where
        F: for<'c> FnOnce(
            &'c mut sqlx::Transaction<'_, sqlx::Postgres>,
        ) -> Pin<Box<dyn Future<Output = std::result::Result<R, E>> + Send + 'c>>,
        E: From<sqlx::Error>,
    {
        let mut tx = self.pool.begin().await?;
        let result = f(&mut tx).await;
        match result {
            Ok(r) => {
                tx.commit().await?;
                Ok(r)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// 데이터베이스 초기화 (전체 삭제 후 재생성)
    pub async fn initialize_database(&self) -> Result<()> {
        let recreate_db_sql = include_str!("../../sql/00-recreate-db.sql");
        self.execute_locked(recreate_db_sql).await?;
        self.apply_schema().await
    }

    /// 스키마 적용 (이미 있으면 유지)
    pub async fn apply_schema(&self) -> Result<()> {
        let create_schema_sql = include_str!("../../sql/01-create-schema.sql");
        self.execute_locked(create_schema_sql).await?;
        info!("{:<12} --> 스키마 적용 완료", "Database");
        Ok(())
    }

    /// advisory lock 을 잡은 커넥션에서 여러 쿼리 실행
    async fn execute_locked(&self, sql: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(SCHEMA_LOCK_KEY)
            .execute(&mut *conn)
            .await?;

        let mut outcome = Ok(());
        for query in sql.split(';') {
            let query = query.trim();
            if query.is_empty() {
                continue;
            }
            if let Err(e) = sqlx::query(query).execute(&mut *conn).await {
                outcome = Err(e);
                break;
            }
        }

        sqlx::query("SELECT pg_advisory_unlock($1)")
            .bind(SCHEMA_LOCK_KEY)
            .execute(&mut *conn)
            .await?;
        outcome.map_err(Into::into)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
