//! 物料版本服务
//!
//! 所有跨表写操作都在一个工作单元内完成：任一步失败即回滚。

use std::sync::Arc;

use materials_adapter_postgres::SqlExecutor;
use materials_errors::{AppError, AppResult};
use materials_telemetry::{
    MAIN_VERSION_UPDATES_TOTAL, MATERIAL_VERSIONS_CREATED_TOTAL, MATERIALS_CREATED_TOTAL,
    TRANSACTIONS_ROLLED_BACK_TOTAL,
};
use tracing::{info, warn};

use crate::application::commands::{CreateMaterialCommand, CreateVersionCommand, MaterialVersionRef};
use crate::domain::entities::{
    Material, MaterialOverview, MaterialVersion, NewMaterialVersion, Subject, Teacher,
    base_version, next_version_number,
};
use crate::domain::repositories::{
    MaterialRepository, MaterialVersionRepository, SubjectRepository, TeacherRepository,
};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::{MaterialId, MaterialVersionId, TeacherId, VersionPatch};

/// 服务依赖的仓储集合
#[derive(Clone)]
pub struct Repositories {
    pub teachers: Arc<dyn TeacherRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub materials: Arc<dyn MaterialRepository>,
    pub versions: Arc<dyn MaterialVersionRepository>,
}

pub struct MaterialService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    teachers: Arc<dyn TeacherRepository>,
    subjects: Arc<dyn SubjectRepository>,
    materials: Arc<dyn MaterialRepository>,
    versions: Arc<dyn MaterialVersionRepository>,
}

impl MaterialService {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, repositories: Repositories) -> Self {
        Self {
            uow_factory,
            teachers: repositories.teachers,
            subjects: repositories.subjects,
            materials: repositories.materials,
            versions: repositories.versions,
        }
    }

    fn db(&self) -> &dyn SqlExecutor {
        self.uow_factory.connection()
    }

    // ========== 查询 ==========

    pub async fn list_teachers(&self) -> AppResult<Vec<Teacher>> {
        self.teachers.list(self.db()).await
    }

    pub async fn get_teacher(&self, teacher_id: TeacherId) -> AppResult<Teacher> {
        self.teachers.get_by_id(self.db(), teacher_id).await
    }

    pub async fn list_subjects(&self) -> AppResult<Vec<Subject>> {
        self.subjects.list(self.db()).await
    }

    pub async fn list_material_overviews(&self) -> AppResult<Vec<MaterialOverview>> {
        self.materials.list_overviews(self.db()).await
    }

    pub async fn get_material(&self, material_id: MaterialId) -> AppResult<Material> {
        self.materials.get_by_id(self.db(), material_id).await
    }

    /// 教师不存在时返回 NotFound，存在但没有物料时返回空列表
    pub async fn list_teacher_materials(&self, teacher_id: TeacherId) -> AppResult<Vec<Material>> {
        self.teachers.get_by_id(self.db(), teacher_id).await?;
        self.materials.list_by_teacher_id(self.db(), teacher_id).await
    }

    pub async fn get_teacher_material(
        &self,
        teacher_id: TeacherId,
        material_id: MaterialId,
    ) -> AppResult<Material> {
        self.materials
            .get_by_teacher(self.db(), teacher_id, material_id)
            .await
    }

    pub async fn list_material_versions(
        &self,
        material_id: MaterialId,
    ) -> AppResult<Vec<MaterialVersion>> {
        self.versions
            .list_all_by_material_id(self.db(), material_id)
            .await
    }

    pub async fn get_material_version(
        &self,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<MaterialVersion> {
        self.versions.get_by_id(self.db(), material_id, version_id).await
    }

    // ========== 事务操作 ==========

    /// 创建物料并写入版本 1，版本 1 同时成为主版本和当前版本
    pub async fn create_material_with_initial_version(
        &self,
        cmd: CreateMaterialCommand,
    ) -> AppResult<MaterialVersionRef> {
        const OP: &str = "create material with initial version";

        let uow = self.uow_factory.begin().await.map_err(|e| e.context(OP))?;
        let result = self.create_material_in(uow.executor(), &cmd).await;
        let created = self.finish(uow, result, OP).await?;

        metrics::counter!(MATERIALS_CREATED_TOTAL).increment(1);
        metrics::counter!(MATERIAL_VERSIONS_CREATED_TOTAL).increment(1);
        info!(
            material_id = %created.material_id,
            version_id = %created.material_version_id,
            teacher_id = %cmd.teacher_id,
            "Material created"
        );
        Ok(created)
    }

    /// 切换主版本并同步当前版本指针，对已是主版本的版本重复调用是幂等的
    pub async fn update_main_version(
        &self,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<MaterialVersionRef> {
        const OP: &str = "update main version";

        let uow = self.uow_factory.begin().await.map_err(|e| e.context(OP))?;
        let result = self.promote_in(uow.executor(), material_id, version_id, true).await;
        let updated = self.finish(uow, result, OP).await?;

        metrics::counter!(MAIN_VERSION_UPDATES_TOTAL).increment(1);
        info!(%material_id, %version_id, "Main version updated");
        Ok(updated)
    }

    /// 追加新版本，可选择同时设为主版本
    pub async fn create_new_version(
        &self,
        material_id: MaterialId,
        cmd: CreateVersionCommand,
    ) -> AppResult<MaterialVersion> {
        const OP: &str = "create new version";

        let uow = self.uow_factory.begin().await.map_err(|e| e.context(OP))?;
        let result = async {
            self.materials.lock_by_id(uow.executor(), material_id).await?;
            self.create_version_in(uow.executor(), material_id, cmd).await
        }
        .await;
        let version = self.finish(uow, result, OP).await?;

        self.record_new_version(&version);
        Ok(version)
    }

    /// 教师修改自己的物料：生成一个新的主版本，未给出的字段沿用当前主版本
    pub async fn update_teacher_material(
        &self,
        teacher_id: TeacherId,
        material_id: MaterialId,
        patch: VersionPatch,
    ) -> AppResult<MaterialVersion> {
        const OP: &str = "update teacher material";

        let uow = self.uow_factory.begin().await.map_err(|e| e.context(OP))?;
        let result = async {
            let material = self.materials.lock_by_id(uow.executor(), material_id).await?;
            if !material.is_owned_by(teacher_id) {
                return Err(AppError::not_found(format!(
                    "material {material_id} not found for teacher {teacher_id}"
                )));
            }
            let cmd = CreateVersionCommand {
                patch,
                promote_to_main: true,
            };
            self.create_version_in(uow.executor(), material_id, cmd).await
        }
        .await;
        let version = self.finish(uow, result, OP).await?;

        self.record_new_version(&version);
        Ok(version)
    }

    /// 删除教师名下的物料及其全部版本
    pub async fn delete_teacher_material(
        &self,
        teacher_id: TeacherId,
        material_id: MaterialId,
    ) -> AppResult<()> {
        const OP: &str = "delete teacher material";

        let uow = self.uow_factory.begin().await.map_err(|e| e.context(OP))?;
        let result = async {
            self.materials
                .get_by_teacher(uow.executor(), teacher_id, material_id)
                .await?;
            self.materials.delete(uow.executor(), material_id).await
        }
        .await;
        self.finish(uow, result, OP).await?;

        info!(%teacher_id, %material_id, "Material deleted");
        Ok(())
    }

    // ========== 事务步骤 ==========

    async fn create_material_in(
        &self,
        db: &dyn SqlExecutor,
        cmd: &CreateMaterialCommand,
    ) -> AppResult<MaterialVersionRef> {
        self.teachers.get_by_id(db, cmd.teacher_id).await?;
        if let Some(subject_id) = cmd.subject_id {
            self.subjects.get_by_id(db, subject_id).await?;
        }

        let material_id = self.materials.create(db, cmd.teacher_id, cmd.subject_id).await?;
        self.materials
            .set_original_material_id(db, material_id, material_id)
            .await?;

        let version_id = self
            .versions
            .create(
                db,
                &NewMaterialVersion {
                    material_id,
                    content: cmd.content.clone(),
                    version_number: 1,
                    is_main: true,
                },
            )
            .await?;

        let current = self
            .materials
            .update_current_version(db, material_id, version_id)
            .await?;

        Ok(MaterialVersionRef {
            material_id,
            material_version_id: current,
        })
    }

    /// 调用方必须已持有物料行锁
    async fn create_version_in(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        cmd: CreateVersionCommand,
    ) -> AppResult<MaterialVersion> {
        let existing = self.versions.list_all_by_material_id(db, material_id).await?;
        let content = cmd.patch.resolve(base_version(&existing))?;

        let version_id = self
            .versions
            .create(
                db,
                &NewMaterialVersion {
                    material_id,
                    content,
                    version_number: next_version_number(&existing),
                    is_main: false,
                },
            )
            .await?;

        // 没有主版本时新版本必须成为主版本
        let has_main = existing.iter().any(|v| v.is_main);
        if cmd.promote_to_main || !has_main {
            self.promote_in(db, material_id, version_id, false).await?;
        }

        self.versions.get_by_id(db, material_id, version_id).await
    }

    /// 设置主版本并把当前版本指向它
    async fn promote_in(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
        lock: bool,
    ) -> AppResult<MaterialVersionRef> {
        if lock {
            self.materials.lock_by_id(db, material_id).await?;
        }
        self.versions
            .set_main_for_material_version(db, material_id, version_id)
            .await?;
        let current = self
            .materials
            .update_current_version(db, material_id, version_id)
            .await?;

        Ok(MaterialVersionRef {
            material_id,
            material_version_id: current,
        })
    }

    /// 成功则提交，失败则回滚；回滚失败只记录日志，返回原始错误
    async fn finish<T>(
        &self,
        uow: Box<dyn UnitOfWork>,
        result: AppResult<T>,
        operation: &str,
    ) -> AppResult<T> {
        match result {
            Ok(value) => {
                uow.commit().await.map_err(|e| e.context(operation))?;
                Ok(value)
            }
            Err(err) => {
                metrics::counter!(TRANSACTIONS_ROLLED_BACK_TOTAL).increment(1);
                warn!(operation, error = %err, "Rolling back transaction");
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(operation, error = %rollback_err, "Rollback failed");
                }
                Err(err.context(operation))
            }
        }
    }

    fn record_new_version(&self, version: &MaterialVersion) {
        metrics::counter!(MATERIAL_VERSIONS_CREATED_TOTAL).increment(1);
        if version.is_main {
            metrics::counter!(MAIN_VERSION_UPDATES_TOTAL).increment(1);
        }
        info!(
            material_id = %version.material_id,
            version_id = %version.id,
            version_number = version.version_number,
            is_main = version.is_main,
            "Material version created"
        );
    }
}
