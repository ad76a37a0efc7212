//! materials-telemetry - 可观测性库

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 新建物料计数
pub const MATERIALS_CREATED_TOTAL: &str = "materials_created_total";
/// 新建版本计数（含初始版本）
pub const MATERIAL_VERSIONS_CREATED_TOTAL: &str = "material_versions_created_total";
/// 主版本切换计数
pub const MAIN_VERSION_UPDATES_TOTAL: &str = "material_main_version_updates_total";
/// 事务回滚计数
pub const TRANSACTIONS_ROLLED_BACK_TOTAL: &str = "material_transactions_rolled_back_total";

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 初始化 tracing
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// 初始化 Prometheus metrics 并注册业务指标说明
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

fn describe_metrics() {
    metrics::describe_counter!(MATERIALS_CREATED_TOTAL, "Materials created");
    metrics::describe_counter!(MATERIAL_VERSIONS_CREATED_TOTAL, "Material versions created");
    metrics::describe_counter!(MAIN_VERSION_UPDATES_TOTAL, "Main version changes");
    metrics::describe_counter!(
        TRANSACTIONS_ROLLED_BACK_TOTAL,
        "Versioning transactions rolled back"
    );
}
