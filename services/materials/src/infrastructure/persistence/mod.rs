//! 持久化层

mod material_repository;
mod material_version_repository;
mod rows;
mod subject_repository;
mod teacher_repository;
mod unit_of_work;

pub use material_repository::PostgresMaterialRepository;
pub use material_version_repository::PostgresMaterialVersionRepository;
pub use subject_repository::PostgresSubjectRepository;
pub use teacher_repository::PostgresTeacherRepository;
pub use unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkFactory};
