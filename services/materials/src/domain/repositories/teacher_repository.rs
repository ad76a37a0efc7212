//! 教师仓储接口

use async_trait::async_trait;
use materials_adapter_postgres::SqlExecutor;
use materials_errors::AppResult;

use crate::domain::entities::Teacher;
use crate::domain::value_objects::TeacherId;

#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// 按 ID 升序列出全部教师
    async fn list(&self, db: &dyn SqlExecutor) -> AppResult<Vec<Teacher>>;

    /// 不存在时返回 NotFound
    async fn get_by_id(&self, db: &dyn SqlExecutor, id: TeacherId) -> AppResult<Teacher>;
}
