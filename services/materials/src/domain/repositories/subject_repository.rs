//! 学科仓储接口

use async_trait::async_trait;
use materials_adapter_postgres::SqlExecutor;
use materials_errors::AppResult;

use crate::domain::entities::Subject;
use crate::domain::value_objects::SubjectId;

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn list(&self, db: &dyn SqlExecutor) -> AppResult<Vec<Subject>>;

    /// 不存在时返回 NotFound
    async fn get_by_id(&self, db: &dyn SqlExecutor, id: SubjectId) -> AppResult<Subject>;
}
