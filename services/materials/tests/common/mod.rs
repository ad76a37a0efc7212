//! 测试用内存仓储与工作单元
//!
//! 工作单元开始时对存储做快照，回滚时整体恢复，用于在没有数据库时验证服务层的事务语义。

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use materials_adapter_postgres::{PgQuery, SqlExecutor};
use materials_errors::{AppError, AppResult};
use materials_service::application::{MaterialService, Repositories};
use materials_service::domain::entities::{
    Material, MaterialOverview, MaterialVersion, NewMaterialVersion, Subject, Teacher,
};
use materials_service::domain::repositories::{
    MaterialRepository, MaterialVersionRepository, SubjectRepository, TeacherRepository,
};
use materials_service::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use materials_service::domain::value_objects::{
    MaterialId, MaterialVersionId, SubjectId, TeacherId,
};
use sqlx::postgres::{PgQueryResult, PgRow};

/// 内存中的全部表
#[derive(Debug, Clone, Default)]
pub struct State {
    pub teachers: BTreeMap<TeacherId, Teacher>,
    pub subjects: BTreeMap<SubjectId, Subject>,
    pub materials: BTreeMap<MaterialId, Material>,
    pub versions: BTreeMap<MaterialVersionId, MaterialVersion>,
    next_id: i64,
    /// 指定操作名时该操作返回存储错误
    pub fail_on: Option<&'static str>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_fail(&self, operation: &str) -> AppResult<()> {
        if self.fail_on == Some(operation) {
            return Err(AppError::database(format!("injected failure in {operation}")));
        }
        Ok(())
    }

    pub fn versions_of(&self, material_id: MaterialId) -> Vec<MaterialVersion> {
        let mut versions: Vec<_> = self
            .versions
            .values()
            .filter(|v| v.material_id == material_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version_number);
        versions
    }
}

#[derive(Clone, Default)]
pub struct Store(Arc<Mutex<State>>);

impl Store {
    pub fn lock(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    pub fn add_teacher(&self, name: &str) -> TeacherId {
        let mut state = self.lock();
        let id = TeacherId(state.next_id());
        state.teachers.insert(
            id,
            Teacher {
                id,
                name: name.to_string(),
                created_at: Utc::now(),
            },
        );
        id
    }

    pub fn add_subject(&self, name: &str) -> SubjectId {
        let mut state = self.lock();
        let id = SubjectId(state.next_id());
        state.subjects.insert(
            id,
            Subject {
                id,
                name: name.to_string(),
                created_at: Utc::now(),
            },
        );
        id
    }

    pub fn fail_on(&self, operation: &'static str) {
        self.lock().fail_on = Some(operation);
    }

    pub fn snapshot(&self) -> State {
        self.lock().clone()
    }

    fn restore(&self, state: State) {
        *self.lock() = state;
    }
}

/// 内存仓储不执行 SQL
pub struct NoopExecutor;

#[async_trait]
impl SqlExecutor for NoopExecutor {
    async fn query(&self, _query: PgQuery<'_>) -> Result<Vec<PgRow>, sqlx::Error> {
        Err(sqlx::Error::Protocol("in-memory store has no SQL executor".into()))
    }

    async fn query_row(&self, _query: PgQuery<'_>) -> Result<Option<PgRow>, sqlx::Error> {
        Err(sqlx::Error::Protocol("in-memory store has no SQL executor".into()))
    }

    async fn exec(&self, _query: PgQuery<'_>) -> Result<PgQueryResult, sqlx::Error> {
        Err(sqlx::Error::Protocol("in-memory store has no SQL executor".into()))
    }
}

// ========== 工作单元 ==========

pub struct FakeUnitOfWork {
    store: Store,
    snapshot: State,
    executor: NoopExecutor,
    stats: Arc<TxStats>,
}

#[derive(Default)]
pub struct TxStats {
    pub begun: AtomicUsize,
    pub committed: AtomicUsize,
    pub rolled_back: AtomicUsize,
}

impl TxStats {
    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::SeqCst)
    }

    pub fn rolled_back(&self) -> usize {
        self.rolled_back.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitOfWork for FakeUnitOfWork {
    fn executor(&self) -> &dyn SqlExecutor {
        &self.executor
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.stats.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.store.restore(self.snapshot);
        self.stats.rolled_back.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeUnitOfWorkFactory {
    store: Store,
    executor: NoopExecutor,
    pub stats: Arc<TxStats>,
}

#[async_trait]
impl UnitOfWorkFactory for FakeUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        self.stats.begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeUnitOfWork {
            store: self.store.clone(),
            snapshot: self.store.snapshot(),
            executor: NoopExecutor,
            stats: self.stats.clone(),
        }))
    }

    fn connection(&self) -> &dyn SqlExecutor {
        &self.executor
    }
}

// ========== 仓储 ==========

pub struct FakeTeacherRepository(Store);

#[async_trait]
impl TeacherRepository for FakeTeacherRepository {
    async fn list(&self, _db: &dyn SqlExecutor) -> AppResult<Vec<Teacher>> {
        Ok(self.0.lock().teachers.values().cloned().collect())
    }

    async fn get_by_id(&self, _db: &dyn SqlExecutor, id: TeacherId) -> AppResult<Teacher> {
        self.0
            .lock()
            .teachers
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("teacher {id} not found")))
    }
}

pub struct FakeSubjectRepository(Store);

#[async_trait]
impl SubjectRepository for FakeSubjectRepository {
    async fn list(&self, _db: &dyn SqlExecutor) -> AppResult<Vec<Subject>> {
        Ok(self.0.lock().subjects.values().cloned().collect())
    }

    async fn get_by_id(&self, _db: &dyn SqlExecutor, id: SubjectId) -> AppResult<Subject> {
        self.0
            .lock()
            .subjects
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("subject {id} not found")))
    }
}

pub struct FakeMaterialRepository(Store);

#[async_trait]
impl MaterialRepository for FakeMaterialRepository {
    async fn create(
        &self,
        _db: &dyn SqlExecutor,
        teacher_id: TeacherId,
        subject_id: Option<SubjectId>,
    ) -> AppResult<MaterialId> {
        let mut state = self.0.lock();
        state.check_fail("materials.create")?;
        if !state.teachers.contains_key(&teacher_id)
            || subject_id.is_some_and(|s| !state.subjects.contains_key(&s))
        {
            return Err(AppError::validation("foreign key constraint violation"));
        }

        let id = MaterialId(state.next_id());
        state.materials.insert(
            id,
            Material {
                id,
                teacher_id,
                subject_id,
                original_material_id: None,
                current_version_id: None,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn set_original_material_id(
        &self,
        _db: &dyn SqlExecutor,
        material_id: MaterialId,
        original_material_id: MaterialId,
    ) -> AppResult<()> {
        let mut state = self.0.lock();
        let material = state
            .materials
            .get_mut(&material_id)
            .ok_or_else(|| AppError::not_found(format!("material {material_id} not found")))?;
        material.original_material_id = Some(original_material_id);
        Ok(())
    }

    async fn get_by_id(&self, _db: &dyn SqlExecutor, id: MaterialId) -> AppResult<Material> {
        self.0
            .lock()
            .materials
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("material {id} not found")))
    }

    async fn lock_by_id(&self, db: &dyn SqlExecutor, id: MaterialId) -> AppResult<Material> {
        self.get_by_id(db, id).await
    }

    async fn get_by_teacher(
        &self,
        _db: &dyn SqlExecutor,
        teacher_id: TeacherId,
        material_id: MaterialId,
    ) -> AppResult<Material> {
        self.0
            .lock()
            .materials
            .get(&material_id)
            .filter(|m| m.teacher_id == teacher_id)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "material {material_id} not found for teacher {teacher_id}"
                ))
            })
    }

    async fn list_by_teacher_id(
        &self,
        _db: &dyn SqlExecutor,
        teacher_id: TeacherId,
    ) -> AppResult<Vec<Material>> {
        Ok(self
            .0
            .lock()
            .materials
            .values()
            .filter(|m| m.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn list_overviews(&self, _db: &dyn SqlExecutor) -> AppResult<Vec<MaterialOverview>> {
        let state = self.0.lock();
        Ok(state
            .materials
            .values()
            .map(|m| {
                let current = m.current_version_id.and_then(|v| state.versions.get(&v));
                MaterialOverview {
                    material_id: m.id,
                    teacher_id: m.teacher_id,
                    teacher_name: state.teachers[&m.teacher_id].name.clone(),
                    subject_id: m.subject_id,
                    subject_name: m
                        .subject_id
                        .and_then(|s| state.subjects.get(&s))
                        .map(|s| s.name.clone()),
                    current_version_id: m.current_version_id,
                    title: current.map(|v| v.title.clone()),
                    summary: current.and_then(|v| v.summary.clone()),
                    description: current.and_then(|v| v.description.clone()),
                    created_at: m.created_at,
                }
            })
            .collect())
    }

    async fn update_current_version(
        &self,
        _db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<MaterialVersionId> {
        let mut state = self.0.lock();
        state.check_fail("materials.update_current_version")?;
        let owner = state.versions.get(&version_id).map(|v| v.material_id);
        if owner != Some(material_id) {
            return Err(AppError::invalid_reference(format!(
                "material version {version_id} does not belong to material {material_id}"
            )));
        }
        let material = state
            .materials
            .get_mut(&material_id)
            .ok_or_else(|| AppError::not_found(format!("material {material_id} not found")))?;
        material.current_version_id = Some(version_id);
        Ok(version_id)
    }

    async fn delete(&self, _db: &dyn SqlExecutor, id: MaterialId) -> AppResult<()> {
        let mut state = self.0.lock();
        if state.materials.remove(&id).is_none() {
            return Err(AppError::not_found(format!("material {id} not found")));
        }
        state.versions.retain(|_, v| v.material_id != id);
        Ok(())
    }
}

pub struct FakeMaterialVersionRepository(Store);

#[async_trait]
impl MaterialVersionRepository for FakeMaterialVersionRepository {
    async fn create(
        &self,
        _db: &dyn SqlExecutor,
        version: &NewMaterialVersion,
    ) -> AppResult<MaterialVersionId> {
        let mut state = self.0.lock();
        state.check_fail("versions.create")?;
        if !state.materials.contains_key(&version.material_id) {
            return Err(AppError::validation("foreign key constraint violation"));
        }
        if state
            .versions
            .values()
            .any(|v| v.material_id == version.material_id && v.version_number == version.version_number)
        {
            return Err(AppError::conflict("Duplicate entry violates unique constraint"));
        }

        let id = MaterialVersionId(state.next_id());
        let content = &version.content;
        state.versions.insert(
            id,
            MaterialVersion {
                id,
                material_id: version.material_id,
                title: content.title().to_string(),
                summary: content.summary().map(str::to_string),
                description: content.description().map(str::to_string),
                content: content.content().to_string(),
                version_number: version.version_number,
                is_main: version.is_main,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get_by_id(
        &self,
        _db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<MaterialVersion> {
        self.0
            .lock()
            .versions
            .get(&version_id)
            .filter(|v| v.material_id == material_id)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "material version {version_id} not found for material {material_id}"
                ))
            })
    }

    async fn list_all_by_material_id(
        &self,
        _db: &dyn SqlExecutor,
        material_id: MaterialId,
    ) -> AppResult<Vec<MaterialVersion>> {
        let state = self.0.lock();
        if !state.materials.contains_key(&material_id) {
            return Err(AppError::not_found(format!("material {material_id} not found")));
        }
        Ok(state.versions_of(material_id))
    }

    async fn set_main_for_material_version(
        &self,
        _db: &dyn SqlExecutor,
        material_id: MaterialId,
        version_id: MaterialVersionId,
    ) -> AppResult<()> {
        let mut state = self.0.lock();
        state.check_fail("versions.set_main")?;
        if !state.materials.contains_key(&material_id) {
            return Err(AppError::not_found(format!("material {material_id} not found")));
        }
        let owner = state
            .versions
            .get(&version_id)
            .map(|v| v.material_id)
            .ok_or_else(|| AppError::not_found(format!("material version {version_id} not found")))?;
        if owner != material_id {
            return Err(AppError::invalid_reference(format!(
                "material version {version_id} belongs to material {owner}, not {material_id}"
            )));
        }

        for version in state.versions.values_mut() {
            if version.material_id == material_id {
                version.is_main = version.id == version_id;
            }
        }
        Ok(())
    }
}

/// 装配好的测试环境
pub struct TestContext {
    pub store: Store,
    pub stats: Arc<TxStats>,
    pub service: Arc<MaterialService>,
}

pub fn test_context() -> TestContext {
    let store = Store::default();
    let stats = Arc::new(TxStats::default());

    let factory = Arc::new(FakeUnitOfWorkFactory {
        store: store.clone(),
        executor: NoopExecutor,
        stats: stats.clone(),
    });
    let repositories = Repositories {
        teachers: Arc::new(FakeTeacherRepository(store.clone())),
        subjects: Arc::new(FakeSubjectRepository(store.clone())),
        materials: Arc::new(FakeMaterialRepository(store.clone())),
        versions: Arc::new(FakeMaterialVersionRepository(store.clone())),
    };

    TestContext {
        store,
        stats,
        service: Arc::new(MaterialService::new(factory, repositories)),
    }
}
