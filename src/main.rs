use curriculos::{
    error::CurriculosError,
    settings::Settings,
    telemetry::{get_tracing_subscriber, init_tracing_subscriber},
};
use tracing::level_filters::LevelFilter;

#[tokio::main]
async fn main() -> Result<(), CurriculosError> {
    let tracing_subscriber = get_tracing_subscriber(LevelFilter::INFO, std::io::stdout);
    init_tracing_subscriber(tracing_subscriber);

    let settings = Settings::get_settings()?;
    // 데이터베이스 마이그레이션과 업로드 디렉토리 생성까지 마친다.
    let server = settings.build_server().await?;

    tracing::info!("Starting Server");
    server.run().await?;

    Ok(())
}
