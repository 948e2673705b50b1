use std::sync::Once;

use tracing::{dispatcher::set_global_default, level_filters::LevelFilter, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{
    filter::Directive, fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry,
};

// 요청 로그는 자세히, 의존 크레이트의 내부 로그는 경고 이상만 남긴다.
const DEFAULT_DIRECTIVES: [&str; 4] = [
    "tower_http=debug",
    "axum::rejection=trace",
    "sqlx=warn",
    "lettre=warn",
];

/// `RUST_LOG`가 없을 때 사용할 필터
fn default_env_filter(level: LevelFilter) -> EnvFilter {
    DEFAULT_DIRECTIVES
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(EnvFilter::default().add_directive(level.into()), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Bunyan JSON 형식으로 `sink`에 기록하는 subscriber를 만든다.
///
/// 반환 타입의 `Send + Sync`는 `init_tracing_subscriber`가 요구한다.
pub fn get_tracing_subscriber<Sink>(
    level: LevelFilter,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_env_filter(level));

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new("curriculos".into(), sink))
}

/// 전역 subscriber로 등록한다. 두 번째 호출부터는 아무 일도 하지 않는다.
pub fn init_tracing_subscriber(tracing_subscriber: impl Subscriber + Send + Sync) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        set_global_default(tracing_subscriber.into()).expect("Failed to set subscriber.");
        // lettre는 `log` 크레이트로 기록한다.
        LogTracer::builder().init().expect("Failed to set logger.");
    })
}
