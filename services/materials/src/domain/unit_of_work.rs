//! Unit of Work 模式
//!
//! 服务层通过工作单元开启、提交和回滚事务，仓储本身从不管理事务。

use async_trait::async_trait;
use materials_adapter_postgres::SqlExecutor;
use materials_errors::AppResult;

/// 一个进行中的事务
///
/// # 使用示例
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
/// let id = materials.create(uow.executor(), teacher_id, None).await?;
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 事务内的语句执行器
    fn executor(&self) -> &dyn SqlExecutor;

    /// 提交事务
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂 trait
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// 自动提交的连接，用于只读查询
    fn connection(&self) -> &dyn SqlExecutor;
}
