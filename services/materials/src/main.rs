//! materials-service 入口

use materials_bootstrap::{Infrastructure, ServiceConfig, run_http_server};
use materials_service::api::{AppState, router};
use materials_service::{MIGRATOR, build_service};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let service_config = ServiceConfig::default().with_migrator(&MIGRATOR);

    run_http_server(service_config, |infra: Infrastructure| async move {
        let service = build_service(infra.transaction_manager());
        info!("Material service initialized");
        Ok(router(AppState::new(service)))
    })
    .await
}
