//! 值对象

mod ids;
mod version_content;

pub use ids::*;
pub use version_content::*;
