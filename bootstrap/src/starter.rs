//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use materials_config::AppConfig;
use materials_errors::AppResult;
use materials_telemetry::init_metrics;
use sqlx::migrate::Migrator;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::health::health_routes;
use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// 服务启动器配置
pub struct ServiceConfig {
    /// 配置目录
    pub config_dir: String,
    /// 内嵌迁移，`database.run_migrations` 为 true 时执行
    pub migrator: Option<&'static Migrator>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            config_dir: "config".to_string(),
            migrator: None,
        }
    }
}

impl ServiceConfig {
    pub fn with_migrator(mut self, migrator: &'static Migrator) -> Self {
        self.migrator = Some(migrator);
        self
    }
}

/// 为服务路由加上请求 ID、访问日志和 CORS
pub fn with_http_layers(router: Router) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// 运行 HTTP 服务
///
/// 1. 加载配置并初始化日志与 metrics
/// 2. 创建连接池（带重试），按需执行迁移
/// 3. 调用 `build_router` 构建业务路由并合并健康检查路由
/// 4. 启动服务器，收到关闭信号后在超时内优雅退出
pub async fn run_http_server<F, Fut>(
    service_config: ServiceConfig,
    build_router: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let config = AppConfig::load(&service_config.config_dir)?;
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let metrics = init_metrics()?;
    let infra = Infrastructure::from_config(&config).await?;

    if config.database.run_migrations {
        if let Some(migrator) = service_config.migrator {
            infra.run_migrations(migrator).await?;
        }
    }

    let pool = infra.postgres_pool();
    let router = build_router(infra).await?;
    let app = with_http_layers(router.merge(health_routes(pool.clone(), Some(metrics))));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server starting");

    let shutdown_started = Arc::new(Notify::new());
    let signal = {
        let shutdown_started = shutdown_started.clone();
        async move {
            shutdown_signal().await;
            shutdown_started.notify_one();
        }
    };
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .into_future();

    tokio::select! {
        result = server => result?,
        _ = async {
            shutdown_started.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!(
                timeout_secs = config.server.shutdown_timeout_secs,
                "Graceful shutdown timed out, closing remaining connections"
            );
        }
    }

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
