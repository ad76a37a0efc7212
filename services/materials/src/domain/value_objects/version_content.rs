//! 版本内容值对象
//!
//! 标题、摘要、描述和正文的长度约束在这里统一校验

use materials_errors::{AppError, AppResult};

use crate::domain::entities::MaterialVersion;

pub const TITLE_MAX_CHARS: usize = 255;
pub const SUMMARY_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const CONTENT_MAX_CHARS: usize = 10000;

fn check_length(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(AppError::validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// 一个版本的完整内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionContent {
    title: String,
    summary: Option<String>,
    description: Option<String>,
    content: String,
}

impl VersionContent {
    pub fn new(
        title: impl Into<String>,
        summary: Option<String>,
        description: Option<String>,
        content: impl Into<String>,
    ) -> AppResult<Self> {
        let title = title.into();
        let content = content.into();

        check_length("title", &title, TITLE_MAX_CHARS)?;
        if let Some(summary) = &summary {
            check_length("summary", summary, SUMMARY_MAX_CHARS)?;
        }
        if let Some(description) = &description {
            check_length("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        check_length("content", &content, CONTENT_MAX_CHARS)?;

        Ok(Self {
            title,
            summary,
            description,
            content,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// 部分更新，未指定的字段沿用基准版本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl VersionPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.description.is_none()
            && self.content.is_none()
    }

    /// 以 `base` 为默认值合成新版本内容
    ///
    /// 没有基准版本时，标题和正文必须显式给出。
    pub fn resolve(self, base: Option<&MaterialVersion>) -> AppResult<VersionContent> {
        let title = self
            .title
            .or_else(|| base.map(|b| b.title.clone()))
            .ok_or_else(|| AppError::validation("title is required"))?;
        let content = self
            .content
            .or_else(|| base.map(|b| b.content.clone()))
            .ok_or_else(|| AppError::validation("content is required"))?;
        let summary = self.summary.or_else(|| base.and_then(|b| b.summary.clone()));
        let description = self
            .description
            .or_else(|| base.and_then(|b| b.description.clone()));

        VersionContent::new(title, summary, description, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{MaterialId, MaterialVersionId};
    use chrono::Utc;

    fn base_version() -> MaterialVersion {
        MaterialVersion {
            id: MaterialVersionId(10),
            material_id: MaterialId(1),
            title: "Fractions".to_string(),
            summary: Some("Intro".to_string()),
            description: None,
            content: "1/2 + 1/4".to_string(),
            version_number: 2,
            is_main: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_length_limits() {
        assert!(VersionContent::new("t", None, None, "c").is_ok());
        assert!(VersionContent::new("a".repeat(TITLE_MAX_CHARS), None, None, "c").is_ok());

        let err = VersionContent::new("a".repeat(TITLE_MAX_CHARS + 1), None, None, "c").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(VersionContent::new("t", Some(String::new()), None, "c").is_err());
        assert!(VersionContent::new("t", None, Some("d".repeat(1001)), "c").is_err());
        assert!(VersionContent::new("t", None, None, "c".repeat(CONTENT_MAX_CHARS + 1)).is_err());
        assert!(VersionContent::new("  ", None, None, "c").is_err());
    }

    #[test]
    fn test_limits_count_characters_not_bytes() {
        let title = "数".repeat(TITLE_MAX_CHARS);
        assert!(VersionContent::new(title, None, None, "c").is_ok());
    }

    #[test]
    fn test_patch_inherits_from_base() {
        let patch = VersionPatch {
            content: Some("3/4".to_string()),
            ..Default::default()
        };
        let resolved = patch.resolve(Some(&base_version())).unwrap();

        assert_eq!(resolved.title(), "Fractions");
        assert_eq!(resolved.summary(), Some("Intro"));
        assert_eq!(resolved.description(), None);
        assert_eq!(resolved.content(), "3/4");
    }

    #[test]
    fn test_patch_without_base_requires_title_and_content() {
        let patch = VersionPatch {
            title: Some("Only title".to_string()),
            ..Default::default()
        };
        let err = patch.resolve(None).unwrap_err();
        assert!(err.to_string().contains("content is required"));
    }
}
