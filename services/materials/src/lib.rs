//! materials-service - 教学物料版本管理服务
//!
//! 教师、学科、物料及其版本历史的 REST 后端

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use materials_adapter_postgres::TransactionManager;
use sqlx::migrate::Migrator;

use crate::application::{MaterialService, Repositories};
use crate::infrastructure::persistence::{
    PostgresMaterialRepository, PostgresMaterialVersionRepository, PostgresSubjectRepository,
    PostgresTeacherRepository, PostgresUnitOfWorkFactory,
};

/// 内嵌的数据库迁移
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 以 PostgreSQL 仓储装配服务
pub fn build_service(transactions: TransactionManager) -> Arc<MaterialService> {
    let repositories = Repositories {
        teachers: Arc::new(PostgresTeacherRepository::new()),
        subjects: Arc::new(PostgresSubjectRepository::new()),
        materials: Arc::new(PostgresMaterialRepository::new()),
        versions: Arc::new(PostgresMaterialVersionRepository::new()),
    };
    let uow_factory = Arc::new(PostgresUnitOfWorkFactory::new(transactions));

    Arc::new(MaterialService::new(uow_factory, repositories))
}
