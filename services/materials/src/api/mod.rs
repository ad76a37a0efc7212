//! API 层 - REST 路由

mod dto;
mod extract;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};

use crate::application::MaterialService;

pub use dto::*;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MaterialService>,
}

impl AppState {
    pub fn new(service: Arc<MaterialService>) -> Self {
        Self { service }
    }
}

/// 构建业务路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/teachers", get(handlers::list_teachers))
        .route("/teachers/{teacher_id}", get(handlers::get_teacher))
        .route(
            "/teachers/{teacher_id}/materials",
            get(handlers::list_teacher_materials).post(handlers::create_material),
        )
        .route(
            "/teachers/{teacher_id}/materials/{material_id}",
            get(handlers::get_teacher_material)
                .patch(handlers::update_teacher_material)
                .delete(handlers::delete_teacher_material),
        )
        .route("/subjects", get(handlers::list_subjects))
        .route("/materials", get(handlers::list_materials))
        .route("/materials/{material_id}", get(handlers::get_material))
        .route(
            "/materials/{material_id}/versions",
            get(handlers::list_versions).post(handlers::create_version),
        )
        .route(
            "/materials/{material_id}/versions/{version_id}",
            get(handlers::get_version),
        )
        .route(
            "/materials/{material_id}/main-version",
            put(handlers::update_main_version),
        )
        .with_state(state)
}
