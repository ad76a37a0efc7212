//! SQL 执行抽象
//!
//! 连接池与事务实现同一组原语，仓储只依赖 `SqlExecutor`，
//! 由调用方决定语句在自动提交连接还是在事务内执行。

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgQueryResult, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::debug;

/// 绑定好参数的 PostgreSQL 语句
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// 语句执行器
///
/// 驱动错误原样返回，本层不做重试。
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// 返回所有结果行
    async fn query(&self, query: PgQuery<'_>) -> Result<Vec<PgRow>, sqlx::Error>;

    /// 返回第一行，无结果时为 `None`
    async fn query_row(&self, query: PgQuery<'_>) -> Result<Option<PgRow>, sqlx::Error>;

    /// 执行语句，返回受影响行数等信息
    async fn exec(&self, query: PgQuery<'_>) -> Result<PgQueryResult, sqlx::Error>;
}

#[async_trait]
impl SqlExecutor for PgPool {
    async fn query(&self, query: PgQuery<'_>) -> Result<Vec<PgRow>, sqlx::Error> {
        query.fetch_all(self).await
    }

    async fn query_row(&self, query: PgQuery<'_>) -> Result<Option<PgRow>, sqlx::Error> {
        query.fetch_optional(self).await
    }

    async fn exec(&self, query: PgQuery<'_>) -> Result<PgQueryResult, sqlx::Error> {
        query.execute(self).await
    }
}

/// 已开启的数据库事务
///
/// 只有 `commit` 之后写入才持久化；未提交即被丢弃时由 sqlx 自动回滚。
pub struct PgTransaction {
    tx: Mutex<Transaction<'static, Postgres>>,
}

impl PgTransaction {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx: Mutex::new(tx) }
    }

    /// 提交事务
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.into_inner().commit().await?;
        debug!("Transaction committed");
        Ok(())
    }

    /// 回滚事务
    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.into_inner().rollback().await?;
        debug!("Transaction rolled back");
        Ok(())
    }
}

#[async_trait]
impl SqlExecutor for PgTransaction {
    async fn query(&self, query: PgQuery<'_>) -> Result<Vec<PgRow>, sqlx::Error> {
        let mut tx = self.tx.lock().await;
        query.fetch_all(&mut **tx).await
    }

    async fn query_row(&self, query: PgQuery<'_>) -> Result<Option<PgRow>, sqlx::Error> {
        let mut tx = self.tx.lock().await;
        query.fetch_optional(&mut **tx).await
    }

    async fn exec(&self, query: PgQuery<'_>) -> Result<PgQueryResult, sqlx::Error> {
        let mut tx = self.tx.lock().await;
        query.execute(&mut **tx).await
    }
}
