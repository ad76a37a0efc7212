//! 仓储接口
//!
//! 每个方法都显式接收 `SqlExecutor`，调用方决定在连接池还是事务上执行

mod material_repository;
mod material_version_repository;
mod subject_repository;
mod teacher_repository;

pub use material_repository::*;
pub use material_version_repository::*;
pub use subject_repository::*;
pub use teacher_repository::*;
