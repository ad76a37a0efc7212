//! 学科

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::SubjectId;

/// 学科目录项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
