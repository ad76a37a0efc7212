//! 学科仓储 PostgreSQL 实现

use async_trait::async_trait;
use materials_adapter_postgres::{SqlExecutor, map_sqlx_error};
use materials_errors::{AppError, AppResult};

use super::rows::{SubjectRow, map_row};
use crate::domain::entities::Subject;
use crate::domain::repositories::SubjectRepository;
use crate::domain::value_objects::SubjectId;

#[derive(Debug, Default, Clone)]
pub struct PostgresSubjectRepository;

impl PostgresSubjectRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubjectRepository for PostgresSubjectRepository {
    async fn list(&self, db: &dyn SqlExecutor) -> AppResult<Vec<Subject>> {
        let rows = db
            .query(sqlx::query("SELECT id, name, created_at FROM subjects ORDER BY id"))
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| map_row::<SubjectRow, Subject>(row).map_err(map_sqlx_error))
            .collect()
    }

    async fn get_by_id(&self, db: &dyn SqlExecutor, id: SubjectId) -> AppResult<Subject> {
        let row = db
            .query_row(sqlx::query("SELECT id, name, created_at FROM subjects WHERE id = $1").bind(id))
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| AppError::not_found(format!("subject {id} not found")))?;

        map_row::<SubjectRow, Subject>(&row).map_err(map_sqlx_error)
    }
}
