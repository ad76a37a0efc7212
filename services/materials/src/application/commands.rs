//! 命令与结果类型

use serde::Serialize;

use crate::domain::value_objects::{
    MaterialId, MaterialVersionId, SubjectId, TeacherId, VersionContent, VersionPatch,
};

/// 创建物料及其初始版本
#[derive(Debug, Clone)]
pub struct CreateMaterialCommand {
    pub teacher_id: TeacherId,
    pub subject_id: Option<SubjectId>,
    pub content: VersionContent,
}

/// 为已有物料追加版本
#[derive(Debug, Clone, Default)]
pub struct CreateVersionCommand {
    pub patch: VersionPatch,
    pub promote_to_main: bool,
}

/// 物料与其当前版本的 ID 对
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaterialVersionRef {
    pub material_id: MaterialId,
    pub material_version_id: MaterialVersionId,
}
