//! 基础设施资源管理

use std::time::Duration;

use materials_adapter_postgres::{
    IsolationLevel, PostgresConfig, TransactionManager, TransactionOptions, create_pool,
    is_sqlx_retryable,
};
use materials_config::AppConfig;
use materials_errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use crate::retry::{RetryConfig, with_retry_if};

/// 基础设施资源容器
///
/// 由 bootstrap 统一初始化，克隆开销很小
#[derive(Clone)]
pub struct Infrastructure {
    postgres_pool: PgPool,
    transactions: TransactionManager,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（连接失败时带重试）
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let isolation: IsolationLevel = config.database.isolation_level.parse()?;

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections)
            .with_min_connections(config.database.min_connections)
            .with_connect_timeout(Duration::from_secs(config.database.connect_timeout_secs));

        let postgres_pool = with_retry_if(
            &RetryConfig::default(),
            "PostgreSQL connection",
            || create_pool(&pg_config),
            is_sqlx_retryable,
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {e}")))?;

        info!(
            max_connections = config.database.max_connections,
            isolation = isolation.as_sql(),
            "PostgreSQL connection pool created"
        );

        Ok(Self::new(postgres_pool, isolation))
    }

    /// 使用已有连接池构建
    pub fn new(postgres_pool: PgPool, isolation: IsolationLevel) -> Self {
        let transactions = TransactionManager::new(postgres_pool.clone())
            .with_options(TransactionOptions::new().with_isolation_level(isolation));

        Self {
            postgres_pool,
            transactions,
        }
    }

    /// 执行内嵌的数据库迁移
    pub async fn run_migrations(&self, migrator: &Migrator) -> AppResult<()> {
        migrator
            .run(&self.postgres_pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// PostgreSQL 连接池
    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    /// 事务管理器
    pub fn transaction_manager(&self) -> TransactionManager {
        self.transactions.clone()
    }
}
