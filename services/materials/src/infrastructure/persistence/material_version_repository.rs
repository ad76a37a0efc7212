//! 物料版本仓储 PostgreSQL 实现

use async_trait::async_trait;
use materials_adapter_postgres::{SqlExecutor, map_sqlx_error};
use materials_errors::{AppError, AppResult};
use sqlx::Row;

use super::rows::{MaterialVersionRow, map_row};
use crate::domain::entities::{MaterialVersion, NewMaterialVersion};
use crate::domain::repositories::MaterialVersionRepository;
use crate::domain::value_objects::{MaterialId, MaterialVersionId};

const VERSION_COLUMNS: &str = "id, material_id, title, summary, description, content, \
                               version_number, is_main, created_at";

#[derive(Debug, Default, Clone)]
pub struct PostgresMaterialVersionRepository;

impl PostgresMaterialVersionRepository {
    pub fn new() -> Self {
        Self
    }

    async fn material_exists(&self, db: &dyn SqlExecutor, material_id: MaterialId) -> AppResult<bool> {
        let row = db
            .query_row(
                sqlx::query("SELECT EXISTS(SELECT 1 FROM materials WHERE id = $1) AS found")
                    .bind(material_id),
            )
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => row.try_get::<bool, _>("found").map_err(map_sqlx_error),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl MaterialVersionRepository for PostgresMaterialVersionRepository {
    async fn create(
        &self,
        db: &dyn SqlExecutor,
        version: &NewMaterialVersion,
    ) -> AppResult<MaterialVersionId> {
        let content = &version.content;
        let row = db
            .query_row(
                sqlx::query(
                    r#"
                    INSERT INTO material_versions
                        (material_id, title, summary, description, content, version_number, is_main)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING id
                    "#,
                )
                .bind(version.material_id)
                .bind(content.title())
                .bind(content.summary())
                .bind(content.description())
                .bind(content.content())
                .bind(version.version_number)
                .bind(version.is_main),
            )
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| AppError::internal("INSERT ... RETURNING produced no row"))?;

        row.try_get::<MaterialVersionId, _>("id").map_err(map_sqlx_error)
    }

    async fn get_by_id(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<MaterialVersion> {
        let sql = format!("SELECT {VERSION_COLUMNS} FROM material_versions WHERE id = $1 AND material_id = $2");

        let row = db
            .query_row(sqlx::query(&sql).bind(version_id).bind(material_id))
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "material version {version_id} not found for material {material_id}"
                ))
            })?;

        map_row::<MaterialVersionRow, MaterialVersion>(&row).map_err(map_sqlx_error)
    }

    async fn list_all_by_material_id(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
    ) -> AppResult<Vec<MaterialVersion>> {
        if !self.material_exists(db, material_id).await? {
            return Err(AppError::not_found(format!("material {material_id} not found")));
        }

        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM material_versions WHERE material_id = $1 ORDER BY version_number ASC"
        );
        let rows = db
            .query(sqlx::query(&sql).bind(material_id))
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| map_row::<MaterialVersionRow, MaterialVersion>(row).map_err(map_sqlx_error))
            .collect()
    }

    async fn set_main_for_material_version(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<()> {
        if !self.material_exists(db, material_id).await? {
            return Err(AppError::not_found(format!("material {material_id} not found")));
        }

        let owner = db
            .query_row(
                sqlx::query("SELECT material_id FROM material_versions WHERE id = $1").bind(version_id),
            )
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| AppError::not_found(format!("material version {version_id} not found")))?
            .try_get::<MaterialId, _>("material_id")
            .map_err(map_sqlx_error)?;

        if owner != material_id {
            return Err(AppError::invalid_reference(format!(
                "material version {version_id} belongs to material {owner}, not {material_id}"
            )));
        }

        // 单条语句完成切换，不会出现两个主版本或没有主版本的中间状态
        db.exec(
            sqlx::query("UPDATE material_versions SET is_main = (id = $2) WHERE material_id = $1")
                .bind(material_id)
                .bind(version_id),
        )
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
