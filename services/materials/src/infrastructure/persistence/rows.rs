//! 数据库行映射结构

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::entities::{Material, MaterialOverview, MaterialVersion, Subject, Teacher};
use crate::domain::value_objects::{
    MaterialId, MaterialVersionId, SubjectId, TeacherId,
};

#[derive(Debug, FromRow)]
pub struct TeacherRow {
    pub id: TeacherId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<TeacherRow> for Teacher {
    fn from(row: TeacherRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SubjectRow {
    pub id: SubjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<SubjectRow> for Subject {
    fn from(row: SubjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct MaterialRow {
    pub id: MaterialId,
    pub teacher_id: TeacherId,
    pub subject_id: Option<SubjectId>,
    pub original_material_id: Option<MaterialId>,
    pub current_version_id: Option<MaterialVersionId>,
    pub created_at: DateTime<Utc>,
}

impl From<MaterialRow> for Material {
    fn from(row: MaterialRow) -> Self {
        Self {
            id: row.id,
            teacher_id: row.teacher_id,
            subject_id: row.subject_id,
            original_material_id: row.original_material_id,
            current_version_id: row.current_version_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct MaterialOverviewRow {
    pub material_id: MaterialId,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub subject_id: Option<SubjectId>,
    pub subject_name: Option<String>,
    pub current_version_id: Option<MaterialVersionId>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MaterialOverviewRow> for MaterialOverview {
    fn from(row: MaterialOverviewRow) -> Self {
        Self {
            material_id: row.material_id,
            teacher_id: row.teacher_id,
            teacher_name: row.teacher_name,
            subject_id: row.subject_id,
            subject_name: row.subject_name,
            current_version_id: row.current_version_id,
            title: row.title,
            summary: row.summary,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct MaterialVersionRow {
    pub id: MaterialVersionId,
    pub material_id: MaterialId,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: String,
    pub version_number: i32,
    pub is_main: bool,
    pub created_at: DateTime<Utc>,
}

impl From<MaterialVersionRow> for MaterialVersion {
    fn from(row: MaterialVersionRow) -> Self {
        Self {
            id: row.id,
            material_id: row.material_id,
            title: row.title,
            summary: row.summary,
            description: row.description,
            content: row.content,
            version_number: row.version_number,
            is_main: row.is_main,
            created_at: row.created_at,
        }
    }
}

/// 将 PgRow 映射为实体
pub fn map_row<R, T>(row: &sqlx::postgres::PgRow) -> Result<T, sqlx::Error>
where
    R: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
    T: From<R>,
{
    R::from_row(row).map(T::from)
}
