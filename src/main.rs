// region:    --- Imports
use marketplace_service::config::Config;
use marketplace_service::database::DatabaseManager;
use marketplace_service::Services;
use std::sync::Arc;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new(&config).await?);

    // 데이터베이스 초기화
    let initialized = if config.reset_database {
        db_manager.initialize_database().await
    } else {
        db_manager.apply_schema().await
    };
    if let Err(e) = initialized {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 서비스 구성 및 판매 유형 검증
    let services = Services::build(Arc::clone(&db_manager), config.sweep_interval);
    if let Err(e) = services.sale_items.verify_sales_types().await {
        error!("{:<12} --> 판매 유형 검증 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!(
        "{:<12} --> 등록된 상품 종류: {:?}",
        "Main",
        services.registry.kinds()
    );

    // 경매 정리 스케줄러
    services.scheduler.start().await;
    info!(
        "{:<12} --> 경매 정리 스케줄러 시작: 주기 {:?}",
        "Main", config.sweep_interval
    );

    tokio::signal::ctrl_c().await?;
    info!("{:<12} --> 종료", "Main");
    Ok(())
}
// endregion: --- Main
