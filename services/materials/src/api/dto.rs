//! 请求与响应结构

use materials_errors::AppResult;
use serde::{Deserialize, Serialize};

use crate::api::extract::positive_id;
use crate::application::{CreateMaterialCommand, CreateVersionCommand};
use crate::domain::value_objects::{MaterialVersionId, SubjectId, TeacherId, VersionContent, VersionPatch};

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

/// POST /teachers/{teacher_id}/materials
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMaterialRequest {
    pub subject_id: Option<i64>,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: String,
}

impl CreateMaterialRequest {
    pub fn into_command(self, teacher_id: TeacherId) -> AppResult<CreateMaterialCommand> {
        let subject_id = self
            .subject_id
            .map(|id| positive_id("subject_id", id).map(SubjectId))
            .transpose()?;

        Ok(CreateMaterialCommand {
            teacher_id,
            subject_id,
            content: VersionContent::new(self.title, self.summary, self.description, self.content)?,
        })
    }
}

/// PATCH /teachers/{teacher_id}/materials/{material_id}
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMaterialRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl From<UpdateMaterialRequest> for VersionPatch {
    fn from(req: UpdateMaterialRequest) -> Self {
        Self {
            title: req.title,
            summary: req.summary,
            description: req.description,
            content: req.content,
        }
    }
}

/// POST /materials/{material_id}/versions
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateVersionRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub promote_to_main: bool,
}

impl From<CreateVersionRequest> for CreateVersionCommand {
    fn from(req: CreateVersionRequest) -> Self {
        Self {
            patch: VersionPatch {
                title: req.title,
                summary: req.summary,
                description: req.description,
                content: req.content,
            },
            promote_to_main: req.promote_to_main,
        }
    }
}

/// PUT /materials/{material_id}/main-version
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMainVersionRequest {
    pub material_version_id: i64,
}

impl UpdateMainVersionRequest {
    pub fn version_id(&self) -> AppResult<MaterialVersionId> {
        positive_id("material_version_id", self.material_version_id).map(MaterialVersionId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let json = r#"{"title":"t","content":"c","is_main":true}"#;
        assert!(serde_json::from_str::<CreateMaterialRequest>(json).is_err());
    }

    #[test]
    fn test_create_request_into_command() {
        let req: CreateMaterialRequest =
            serde_json::from_str(r#"{"subject_id":3,"title":"Algebra","content":"x + y"}"#).unwrap();
        let cmd = req.into_command(TeacherId(1)).unwrap();
        assert_eq!(cmd.subject_id, Some(SubjectId(3)));
        assert_eq!(cmd.content.title(), "Algebra");
        assert_eq!(cmd.content.summary(), None);
    }

    #[test]
    fn test_create_request_validates_subject_id() {
        let req: CreateMaterialRequest =
            serde_json::from_str(r#"{"subject_id":0,"title":"Algebra","content":"x"}"#).unwrap();
        assert!(req.into_command(TeacherId(1)).is_err());
    }

    #[test]
    fn test_create_version_request_defaults() {
        let req: CreateVersionRequest = serde_json::from_str(r#"{"content":"new"}"#).unwrap();
        let cmd = CreateVersionCommand::from(req);
        assert!(!cmd.promote_to_main);
        assert_eq!(cmd.patch.content.as_deref(), Some("new"));
        assert!(cmd.patch.title.is_none());
    }
}
