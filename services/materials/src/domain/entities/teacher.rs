//! 教师

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::TeacherId;

/// 教师，创建后只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
