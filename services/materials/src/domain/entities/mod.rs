//! 领域实体

mod material;
mod material_version;
mod subject;
mod teacher;

pub use material::*;
pub use material_version::*;
pub use subject::*;
pub use teacher::*;
