//! 物料

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{MaterialId, MaterialVersionId, SubjectId, TeacherId};

/// 物料，内容全部保存在版本中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Material {
    pub id: MaterialId,
    pub teacher_id: TeacherId,
    pub subject_id: Option<SubjectId>,
    /// 创建后指向自身
    pub original_material_id: Option<MaterialId>,
    /// 非空时必须是本物料的某个版本
    pub current_version_id: Option<MaterialVersionId>,
    pub created_at: DateTime<Utc>,
}

impl Material {
    pub fn is_owned_by(&self, teacher_id: TeacherId) -> bool {
        self.teacher_id == teacher_id
    }
}

/// 物料列表视图，附带教师、学科名称和当前版本的文本字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialOverview {
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
