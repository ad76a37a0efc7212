//! materials-adapter-postgres - PostgreSQL 适配器
//!
//! 连接池、事务与统一的 SQL 执行抽象

mod connection;
mod error_mapper;
mod executor;
mod transaction;

pub use connection::*;
pub use error_mapper::*;
pub use executor::*;
pub use transaction::*;
