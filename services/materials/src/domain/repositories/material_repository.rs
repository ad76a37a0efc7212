//! 物料仓储接口

use async_trait::async_trait;
use materials_adapter_postgres::SqlExecutor;
use materials_errors::AppResult;

use crate::domain::entities::{Material, MaterialOverview};
use crate::domain::value_objects::{MaterialId, MaterialVersionId, SubjectId, TeacherId};

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// 插入物料，`current_version_id` 与 `original_material_id` 为空
    ///
    /// 外键不存在时返回 Validation
    async fn create(
        &self,
        db: &dyn SqlExecutor,
        teacher_id: TeacherId,
        subject_id: Option<SubjectId>,
    ) -> AppResult<MaterialId>;

    /// 设置来源物料
    async fn set_original_material_id(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        original_material_id: MaterialId,
    ) -> AppResult<()>;

    /// 不存在时返回 NotFound
    async fn get_by_id(&self, db: &dyn SqlExecutor, id: MaterialId) -> AppResult<Material>;

    /// 与 `get_by_id` 相同，但在当前事务中锁定该行直到事务结束
    async fn lock_by_id(&self, db: &dyn SqlExecutor, id: MaterialId) -> AppResult<Material>;

    /// 物料不存在或不属于该教师时返回 NotFound
    async fn get_by_teacher(
        &self,
        db: &dyn SqlExecutor,
        teacher_id: TeacherId,
        material_id: MaterialId,
    ) -> AppResult<Material>;

    /// 教师名下的全部物料，没有时返回空列表
    async fn list_by_teacher_id(
        &self,
        db: &dyn SqlExecutor,
        teacher_id: TeacherId,
    ) -> AppResult<Vec<Material>>;

    /// 全部物料的列表视图
    async fn list_overviews(&self, db: &dyn SqlExecutor) -> AppResult<Vec<MaterialOverview>>;

    /// 更新当前版本指针
    ///
    /// 先校验版本存在且属于该物料，否则返回 InvalidReference 且不修改任何行。
    async fn update_current_version(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<MaterialVersionId>;

    /// 删除物料，其版本级联删除
    async fn delete(&self, db: &dyn SqlExecutor, id: MaterialId) -> AppResult<()>;
}
