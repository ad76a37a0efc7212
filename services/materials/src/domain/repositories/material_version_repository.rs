//! 物料版本仓储接口

use async_trait::async_trait;
use materials_adapter_postgres::SqlExecutor;
use materials_errors::AppResult;

use crate::domain::entities::{MaterialVersion, NewMaterialVersion};
use crate::domain::value_objects::{MaterialId, MaterialVersionId};

#[async_trait]
pub trait MaterialVersionRepository: Send + Sync {
    /// 插入版本，不做业务校验
    async fn create(
        &self,
        db: &dyn SqlExecutor,
        version: &NewMaterialVersion,
    ) -> AppResult<MaterialVersionId>;

    /// 版本不存在或属于其他物料时返回 NotFound
    async fn get_by_id(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<MaterialVersion>;

    /// 按版本号升序返回，物料不存在时返回 NotFound
    async fn list_all_by_material_id(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
    ) -> AppResult<Vec<MaterialVersion>>;

    /// 将指定版本设为主版本，同物料的其他版本全部取消主版本
    ///
    /// - 物料或版本不存在：NotFound
    /// - 版本属于其他物料：InvalidReference
    ///
    /// 不修改 `materials.current_version_id`。
    async fn set_main_for_material_version(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<()>;
}
