//! 教师仓储 PostgreSQL 实现

use async_trait::async_trait;
use materials_adapter_postgres::{SqlExecutor, map_sqlx_error};
use materials_errors::{AppError, AppResult};

use super::rows::{TeacherRow, map_row};
use crate::domain::entities::Teacher;
use crate::domain::repositories::TeacherRepository;
use crate::domain::value_objects::TeacherId;

#[derive(Debug, Default, Clone)]
pub struct PostgresTeacherRepository;

impl PostgresTeacherRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TeacherRepository for PostgresTeacherRepository {
    async fn list(&self, db: &dyn SqlExecutor) -> AppResult<Vec<Teacher>> {
        let rows = db
            .query(sqlx::query("SELECT id, name, created_at FROM teachers ORDER BY id"))
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| map_row::<TeacherRow, Teacher>(row).map_err(map_sqlx_error))
            .collect()
    }

    async fn get_by_id(&self, db: &dyn SqlExecutor, id: TeacherId) -> AppResult<Teacher> {
        let row = db
            .query_row(sqlx::query("SELECT id, name, created_at FROM teachers WHERE id = $1").bind(id))
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| AppError::not_found(format!("teacher {id} not found")))?;

        map_row::<TeacherRow, Teacher>(&row).map_err(map_sqlx_error)
    }
}
