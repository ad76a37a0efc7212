//! HTTP 处理器
//!
//! 只负责参数解析和响应封装，业务逻辑全部在 `MaterialService`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use materials_errors::AppResult;

use crate::api::dto::{
    CreateMaterialRequest, CreateVersionRequest, PingResponse, UpdateMainVersionRequest,
    UpdateMaterialRequest,
};
use crate::api::extract::{ApiJson, ApiPath, positive_id};
use crate::api::AppState;
use crate::application::MaterialVersionRef;
use crate::domain::entities::{Material, MaterialOverview, MaterialVersion, Subject, Teacher};
use crate::domain::value_objects::{MaterialId, MaterialVersionId, TeacherId};

fn teacher_id(raw: i64) -> AppResult<TeacherId> {
    positive_id("teacher_id", raw).map(TeacherId)
}

fn material_id(raw: i64) -> AppResult<MaterialId> {
    positive_id("material_id", raw).map(MaterialId)
}

fn version_id(raw: i64) -> AppResult<MaterialVersionId> {
    positive_id("version_id", raw).map(MaterialVersionId)
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { message: "pong" })
}

// ========== 教师与学科 ==========

pub async fn list_teachers(State(state): State<AppState>) -> AppResult<Json<Vec<Teacher>>> {
    Ok(Json(state.service.list_teachers().await?))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    ApiPath(raw_teacher_id): ApiPath<i64>,
) -> AppResult<Json<Teacher>> {
    let teacher = state.service.get_teacher(teacher_id(raw_teacher_id)?).await?;
    Ok(Json(teacher))
}

pub async fn list_subjects(State(state): State<AppState>) -> AppResult<Json<Vec<Subject>>> {
    Ok(Json(state.service.list_subjects().await?))
}

// ========== 教师的物料 ==========

pub async fn list_teacher_materials(
    State(state): State<AppState>,
    ApiPath(raw_teacher_id): ApiPath<i64>,
) -> AppResult<Json<Vec<Material>>> {
    let materials = state
        .service
        .list_teacher_materials(teacher_id(raw_teacher_id)?)
        .await?;
    Ok(Json(materials))
}

pub async fn create_material(
    State(state): State<AppState>,
    ApiPath(raw_teacher_id): ApiPath<i64>,
    ApiJson(body): ApiJson<CreateMaterialRequest>,
) -> AppResult<(StatusCode, Json<MaterialVersionRef>)> {
    let cmd = body.into_command(teacher_id(raw_teacher_id)?)?;
    let created = state.service.create_material_with_initial_version(cmd).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_teacher_material(
    State(state): State<AppState>,
    ApiPath((raw_teacher_id, raw_material_id)): ApiPath<(i64, i64)>,
) -> AppResult<Json<Material>> {
    let material = state
        .service
        .get_teacher_material(teacher_id(raw_teacher_id)?, material_id(raw_material_id)?)
        .await?;
    Ok(Json(material))
}

pub async fn update_teacher_material(
    State(state): State<AppState>,
    ApiPath((raw_teacher_id, raw_material_id)): ApiPath<(i64, i64)>,
    ApiJson(body): ApiJson<UpdateMaterialRequest>,
) -> AppResult<Json<MaterialVersion>> {
    let version = state
        .service
        .update_teacher_material(
            teacher_id(raw_teacher_id)?,
            material_id(raw_material_id)?,
            body.into(),
        )
        .await?;
    Ok(Json(version))
}

pub async fn delete_teacher_material(
    State(state): State<AppState>,
    ApiPath((raw_teacher_id, raw_material_id)): ApiPath<(i64, i64)>,
) -> AppResult<StatusCode> {
    state
        .service
        .delete_teacher_material(teacher_id(raw_teacher_id)?, material_id(raw_material_id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== 物料与版本 ==========

pub async fn list_materials(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MaterialOverview>>> {
    Ok(Json(state.service.list_material_overviews().await?))
}

pub async fn get_material(
    State(state): State<AppState>,
    ApiPath(raw_material_id): ApiPath<i64>,
) -> AppResult<Json<Material>> {
    let material = state.service.get_material(material_id(raw_material_id)?).await?;
    Ok(Json(material))
}

pub async fn list_versions(
    State(state): State<AppState>,
    ApiPath(raw_material_id): ApiPath<i64>,
) -> AppResult<Json<Vec<MaterialVersion>>> {
    let versions = state
        .service
        .list_material_versions(material_id(raw_material_id)?)
        .await?;
    Ok(Json(versions))
}

pub async fn create_version(
    State(state): State<AppState>,
    ApiPath(raw_material_id): ApiPath<i64>,
    ApiJson(body): ApiJson<CreateVersionRequest>,
) -> AppResult<(StatusCode, Json<MaterialVersion>)> {
    let version = state
        .service
        .create_new_version(material_id(raw_material_id)?, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(version)))
}

pub async fn get_version(
    State(state): State<AppState>,
    ApiPath((raw_material_id, raw_version_id)): ApiPath<(i64, i64)>,
) -> AppResult<Json<MaterialVersion>> {
    let version = state
        .service
        .get_material_version(material_id(raw_material_id)?, version_id(raw_version_id)?)
        .await?;
    Ok(Json(version))
}

pub async fn update_main_version(
    State(state): State<AppState>,
    ApiPath(raw_material_id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateMainVersionRequest>,
) -> AppResult<Json<MaterialVersionRef>> {
    let updated = state
        .service
        .update_main_version(material_id(raw_material_id)?, body.version_id()?)
        .await?;
    Ok(Json(updated))
}
