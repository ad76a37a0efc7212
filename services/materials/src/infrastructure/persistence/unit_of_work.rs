//! Unit of Work PostgreSQL 实现

use async_trait::async_trait;
use materials_adapter_postgres::{PgTransaction, SqlExecutor, TransactionManager};
use materials_errors::AppResult;

use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// 基于单个数据库事务的工作单元
pub struct PostgresUnitOfWork {
    tx: PgTransaction,
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn executor(&self) -> &dyn SqlExecutor {
        &self.tx
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        TransactionManager::commit(self.tx).await
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        TransactionManager::rollback(self.tx).await
    }
}

#[derive(Clone)]
pub struct PostgresUnitOfWorkFactory {
    transactions: TransactionManager,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(transactions: TransactionManager) -> Self {
        Self { transactions }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.transactions.begin().await?;
        Ok(Box::new(PostgresUnitOfWork { tx }))
    }

    fn connection(&self) -> &dyn SqlExecutor {
        self.transactions.pool()
    }
}
