//! PostgreSQL 事务管理模块

use std::str::FromStr;

use materials_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::debug;

use crate::executor::PgTransaction;

/// 事务隔离级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IsolationLevel {
    /// 读已提交（PostgreSQL 默认）
    #[default]
    ReadCommitted,
    /// 可重复读
    RepeatableRead,
    /// 可串行化
    Serializable,
}

impl IsolationLevel {
    /// 转换为 SQL 字符串
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl FromStr for IsolationLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "read_committed" => Ok(Self::ReadCommitted),
            "repeatable_read" => Ok(Self::RepeatableRead),
            "serializable" => Ok(Self::Serializable),
            other => Err(AppError::validation(format!(
                "Unsupported isolation level: {other}"
            ))),
        }
    }
}

/// 事务选项
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionOptions {
    pub isolation_level: IsolationLevel,
    pub read_only: bool,
}

impl TransactionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置隔离级别
    pub fn with_isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = level;
        self
    }

    /// 设置为只读
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// 与数据库默认行为一致时无需额外语句
    fn is_default(&self) -> bool {
        self.isolation_level == IsolationLevel::ReadCommitted && !self.read_only
    }

    /// 生成 SET TRANSACTION 语句
    pub fn to_sql(&self) -> String {
        let mode = if self.read_only { "READ ONLY" } else { "READ WRITE" };
        format!(
            "SET TRANSACTION ISOLATION LEVEL {}, {}",
            self.isolation_level.as_sql(),
            mode
        )
    }
}

/// 事务管理器
#[derive(Clone)]
pub struct TransactionManager {
    pool: PgPool,
    options: TransactionOptions,
}

impl TransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            options: TransactionOptions::default(),
        }
    }

    /// 设置默认事务选项
    pub fn with_options(mut self, options: TransactionOptions) -> Self {
        self.options = options;
        self
    }

    /// 获取连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 以默认选项开始事务
    pub async fn begin(&self) -> AppResult<PgTransaction> {
        self.begin_with_options(&self.options).await
    }

    /// 开始带选项的事务
    pub async fn begin_with_options(&self, options: &TransactionOptions) -> AppResult<PgTransaction> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::transaction(format!("Failed to begin transaction: {e}")))?;

        if !options.is_default() {
            sqlx::query(&options.to_sql())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::transaction(format!("Failed to set transaction options: {e}"))
                })?;
        }

        debug!(isolation = options.isolation_level.as_sql(), "Transaction started");
        Ok(PgTransaction::new(tx))
    }

    /// 提交事务
    pub async fn commit(tx: PgTransaction) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::transaction(format!("Failed to commit transaction: {e}")))
    }

    /// 回滚事务
    pub async fn rollback(tx: PgTransaction) -> AppResult<()> {
        tx.rollback()
            .await
            .map_err(|e| AppError::transaction(format!("Failed to rollback transaction: {e}")))
    }
}
