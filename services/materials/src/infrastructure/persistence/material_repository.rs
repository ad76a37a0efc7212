//! 物料仓储 PostgreSQL 实现

use async_trait::async_trait;
use materials_adapter_postgres::{SqlExecutor, map_sqlx_error};
use materials_errors::{AppError, AppResult};
use sqlx::Row;

use super::rows::{MaterialOverviewRow, MaterialRow, map_row};
use crate::domain::entities::{Material, MaterialOverview};
use crate::domain::repositories::MaterialRepository;
use crate::domain::value_objects::{MaterialId, MaterialVersionId, SubjectId, TeacherId};

const MATERIAL_COLUMNS: &str =
    "id, teacher_id, subject_id, original_material_id, current_version_id, created_at";

#[derive(Debug, Default, Clone)]
pub struct PostgresMaterialRepository;

impl PostgresMaterialRepository {
    pub fn new() -> Self {
        Self
    }

    async fn fetch_one(
        &self,
        db: &dyn SqlExecutor,
        id: MaterialId,
        for_update: bool,
    ) -> AppResult<Material> {
        let sql = format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1{}",
            if for_update { " FOR UPDATE" } else { "" }
        );

        let row = db
            .query_row(sqlx::query(&sql).bind(id))
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| AppError::not_found(format!("material {id} not found")))?;

        map_row::<MaterialRow, Material>(&row).map_err(map_sqlx_error)
    }
}

#[async_trait]
impl MaterialRepository for PostgresMaterialRepository {
    async fn create(
        &self,
        db: &dyn SqlExecutor,
        teacher_id: TeacherId,
        subject_id: Option<SubjectId>,
    ) -> AppResult<MaterialId> {
        let row = db
            .query_row(
                sqlx::query(
                    "INSERT INTO materials (teacher_id, subject_id) VALUES ($1, $2) RETURNING id",
                )
                .bind(teacher_id)
                .bind(subject_id),
            )
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| AppError::internal("INSERT ... RETURNING produced no row"))?;

        row.try_get::<MaterialId, _>("id").map_err(map_sqlx_error)
    }

    async fn set_original_material_id(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        original_material_id: MaterialId,
    ) -> AppResult<()> {
        let result = db
            .exec(
                sqlx::query("UPDATE materials SET original_material_id = $2 WHERE id = $1")
                    .bind(material_id)
                    .bind(original_material_id),
            )
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("material {material_id} not found")));
        }
        Ok(())
    }

    async fn get_by_id(&self, db: &dyn SqlExecutor, id: MaterialId) -> AppResult<Material> {
        self.fetch_one(db, id, false).await
    }

    async fn lock_by_id(&self, db: &dyn SqlExecutor, id: MaterialId) -> AppResult<Material> {
        self.fetch_one(db, id, true).await
    }

    async fn get_by_teacher(
        &self,
        db: &dyn SqlExecutor,
        teacher_id: TeacherId,
        material_id: MaterialId,
    ) -> AppResult<Material> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1 AND teacher_id = $2");

        let row = db
            .query_row(sqlx::query(&sql).bind(material_id).bind(teacher_id))
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "material {material_id} not found for teacher {teacher_id}"
                ))
            })?;

        map_row::<MaterialRow, Material>(&row).map_err(map_sqlx_error)
    }

    async fn list_by_teacher_id(
        &self,
        db: &dyn SqlExecutor,
        teacher_id: TeacherId,
    ) -> AppResult<Vec<Material>> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE teacher_id = $1 ORDER BY id");

        let rows = db
            .query(sqlx::query(&sql).bind(teacher_id))
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| map_row::<MaterialRow, Material>(row).map_err(map_sqlx_error))
            .collect()
    }

    async fn list_overviews(&self, db: &dyn SqlExecutor) -> AppResult<Vec<MaterialOverview>> {
        let rows = db
            .query(sqlx::query(
                r#"
                SELECT m.id AS material_id, m.teacher_id, t.name AS teacher_name,
                       m.subject_id, s.name AS subject_name, m.current_version_id,
                       v.title, v.summary, v.description, m.created_at
                FROM materials m
                JOIN teachers t ON t.id = m.teacher_id
                LEFT JOIN subjects s ON s.id = m.subject_id
                LEFT JOIN material_versions v ON v.id = m.current_version_id
                ORDER BY m.id
                "#,
            ))
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| map_row::<MaterialOverviewRow, MaterialOverview>(row).map_err(map_sqlx_error))
            .collect()
    }

    async fn update_current_version(
        &self,
        db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<MaterialVersionId> {
        let owner = db
            .query_row(
                sqlx::query("SELECT material_id FROM material_versions WHERE id = $1").bind(version_id),
            )
            .await
            .map_err(map_sqlx_error)?
            .map(|row| row.try_get::<MaterialId, _>("material_id"))
            .transpose()
            .map_err(map_sqlx_error)?;

        if owner != Some(material_id) {
            return Err(AppError::invalid_reference(format!(
                "material version {version_id} does not belong to material {material_id}"
            )));
        }

        let result = db
            .exec(
                sqlx::query("UPDATE materials SET current_version_id = $2 WHERE id = $1")
                    .bind(material_id)
                    .bind(version_id),
            )
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("material {material_id} not found")));
        }
        Ok(version_id)
    }

    async fn delete(&self, db: &dyn SqlExecutor, id: MaterialId) -> AppResult<()> {
        let result = db
            .exec(sqlx::query("DELETE FROM materials WHERE id = $1").bind(id))
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("material {id} not found")));
        }
        Ok(())
    }
}
