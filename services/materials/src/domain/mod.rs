//! 领域层
//!
//! 实体、值对象、仓储接口和工作单元

pub mod entities;
pub mod repositories;
pub mod unit_of_work;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use unit_of_work::*;
pub use value_objects::*;
