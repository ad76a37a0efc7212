//! 演示数据填充
//!
//! 每张表已有数据时跳过，可重复执行。物料和版本通过 `MaterialService` 写入，
//! 与线上请求走同一条事务路径。

use materials_bootstrap::{Infrastructure, init_runtime};
use materials_config::AppConfig;
use materials_errors::{AppError, AppResult};
use materials_service::application::{CreateMaterialCommand, CreateVersionCommand, MaterialService};
use materials_service::domain::value_objects::{VersionContent, VersionPatch};
use materials_service::{MIGRATOR, build_service};
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use tracing::info;

const TEACHER_NAMES: &[&str] = &[
    "Ada Lindqvist",
    "Bruno Okafor",
    "Chen Yue",
    "Dalia Haddad",
    "Erik Johansson",
];
const SUBJECT_NAMES: &[&str] = &["Mathematics", "Physics", "Biology", "History", "Literature"];
const TOPICS: &[&str] = &[
    "fractions", "momentum", "photosynthesis", "revolutions", "poetry", "vectors", "cells",
    "empires", "novels", "probability",
];
const MATERIALS_PER_TEACHER: usize = 3;
const VERSIONS_PER_MATERIAL: usize = 3;

async fn seed_names(pool: &PgPool, table: &str, names: &[&str]) -> AppResult<()> {
    let count_sql = format!("SELECT COUNT(*) FROM {table}");
    let (count,): (i64,) = sqlx::query_as(&count_sql)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if count > 0 {
        info!(table, "Already seeded, skipping");
        return Ok(());
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::transaction(e.to_string()))?;
    let insert_sql = format!("INSERT INTO {table} (name) VALUES ($1)");
    for name in names {
        sqlx::query(&insert_sql)
            .bind(*name)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
    }
    tx.commit()
        .await
        .map_err(|e| AppError::transaction(e.to_string()))?;

    info!(table, rows = names.len(), "Seeded");
    Ok(())
}

fn sample_content(rng: &mut impl Rng, revision: usize) -> AppResult<VersionContent> {
    let topic = TOPICS[rng.gen_range(0..TOPICS.len())];
    VersionContent::new(
        format!("Introduction to {topic}"),
        Some(format!("Revision {revision} of the {topic} handout")),
        Some(format!("Classroom material covering the basics of {topic}.")),
        format!("Lesson notes on {topic}, revision {revision}."),
    )
}

async fn seed_materials(service: &MaterialService) -> AppResult<()> {
    if !service.list_material_overviews().await?.is_empty() {
        info!("Materials already seeded, skipping");
        return Ok(());
    }

    let teachers = service.list_teachers().await?;
    let mut subjects = service.list_subjects().await?;
    let mut rng = rand::thread_rng();

    for teacher in &teachers {
        subjects.shuffle(&mut rng);
        for subject in subjects.iter().take(MATERIALS_PER_TEACHER) {
            let created = service
                .create_material_with_initial_version(CreateMaterialCommand {
                    teacher_id: teacher.id,
                    subject_id: Some(subject.id),
                    content: sample_content(&mut rng, 1)?,
                })
                .await?;

            for revision in 2..=VERSIONS_PER_MATERIAL {
                let content = sample_content(&mut rng, revision)?;
                service
                    .create_new_version(
                        created.material_id,
                        CreateVersionCommand {
                            patch: VersionPatch {
                                title: Some(content.title().to_string()),
                                summary: content.summary().map(str::to_string),
                                description: content.description().map(str::to_string),
                                content: Some(content.content().to_string()),
                            },
                            promote_to_main: false,
                        },
                    )
                    .await?;
            }
        }
    }

    info!(teachers = teachers.len(), "Materials seeded");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;
    init_runtime(&config);

    let infra = Infrastructure::from_config(&config).await?;
    infra.run_migrations(&MIGRATOR).await?;

    let pool = infra.postgres_pool();
    seed_names(&pool, "teachers", TEACHER_NAMES).await?;
    seed_names(&pool, "subjects", SUBJECT_NAMES).await?;

    let service = build_service(infra.transaction_manager());
    seed_materials(&service).await?;

    pool.close().await;
    Ok(())
}
