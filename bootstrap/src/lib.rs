//! materials-bootstrap - 服务启动骨架
//!
//! 配置加载、日志、连接池、健康检查与 HTTP 服务生命周期

mod health;
mod infrastructure;
mod retry;
mod runtime;
mod starter;

pub use health::*;
pub use infrastructure::*;
pub use retry::*;
pub use runtime::*;
pub use starter::*;
