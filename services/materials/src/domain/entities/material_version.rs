//! 物料版本

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{MaterialId, MaterialVersionId, VersionContent};

/// 物料的一个不可变修订
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialVersion {
    pub id: MaterialVersionId,
    pub material_id: MaterialId,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: String,
    /// 从 1 开始，同一物料内严格递增且不复用
    pub version_number: i32,
    pub is_main: bool,
    pub created_at: DateTime<Utc>,
}

/// 待插入的版本
#[derive(Debug, Clone)]
pub struct NewMaterialVersion {
    pub material_id: MaterialId,
    pub content: VersionContent,
    pub version_number: i32,
    pub is_main: bool,
}

/// 选择新版本的默认值来源：主版本，没有主版本时取编号最大的版本
pub fn base_version(versions: &[MaterialVersion]) -> Option<&MaterialVersion> {
    versions
        .iter()
        .find(|v| v.is_main)
        .or_else(|| versions.iter().max_by_key(|v| v.version_number))
}

/// 下一个版本号
pub fn next_version_number(versions: &[MaterialVersion]) -> i32 {
    versions.iter().map(|v| v.version_number).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn version(id: i64, number: i32, is_main: bool) -> MaterialVersion {
        MaterialVersion {
            id: MaterialVersionId(id),
            material_id: MaterialId(1),
            title: format!("v{number}"),
            summary: None,
            description: None,
            content: "body".to_string(),
            version_number: number,
            is_main,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_next_version_number_skips_gaps() {
        assert_eq!(next_version_number(&[]), 1);
        let versions = vec![version(1, 1, false), version(2, 4, true), version(3, 2, false)];
        assert_eq!(next_version_number(&versions), 5);
    }

    #[test]
    fn test_base_version_prefers_main() {
        let versions = vec![version(1, 1, false), version(2, 2, true), version(3, 3, false)];
        assert_eq!(base_version(&versions).map(|v| v.id), Some(MaterialVersionId(2)));

        let versions = vec![version(1, 1, false), version(3, 3, false)];
        assert_eq!(base_version(&versions).map(|v| v.id), Some(MaterialVersionId(3)));

        assert!(base_version(&[]).is_none());
    }
}
