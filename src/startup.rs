use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing,
    Router,
};
use http::Request;
use tokio::net::TcpListener;
use tower_http::{
    services::ServeDir,
    trace::{MakeSpan, TraceLayer},
};
use tracing::{Level, Span};

use crate::{
    authentication::{reject_invalid_admin_token, AdminToken},
    email_client::EmailClient,
    error::CurriculosError,
    routes::{
        admin_page, download_resume, health_check, index_page, list_applications, submit,
        StaticDirectory,
    },
    settings::{DefaultDBPool, Settings},
    storage::UploadStorage,
};

// 파일 외의 폼 필드와 멀티파트 경계 문자열을 위한 여유분
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// 핸들러가 공유하는 상태
/// 각 핸들러는 `State<T>`로 필요한 부분만 꺼낸다.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DefaultDBPool>,
    pub email_client: Arc<EmailClient>,
    pub storage: Arc<UploadStorage>,
    pub admin_token: AdminToken,
    pub static_directory: StaticDirectory,
}

impl FromRef<AppState> for Arc<DefaultDBPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<EmailClient> {
    fn from_ref(state: &AppState) -> Self {
        state.email_client.clone()
    }
}

impl FromRef<AppState> for Arc<UploadStorage> {
    fn from_ref(state: &AppState) -> Self {
        state.storage.clone()
    }
}

impl FromRef<AppState> for AdminToken {
    fn from_ref(state: &AppState) -> Self {
        state.admin_token.clone()
    }
}

impl FromRef<AppState> for StaticDirectory {
    fn from_ref(state: &AppState) -> Self {
        state.static_directory.clone()
    }
}

pub struct Server {
    tcp_listener: TcpListener,
    router: Router,
}

impl Server {
    /// 설정으로부터 서버를 구성한다.
    /// 데이터베이스 마이그레이션도 이 때 수행한다.
    pub async fn build(settings: &Settings) -> Result<Self, CurriculosError> {
        let tcp_listener = settings.application.get_listener().await?;
        let pool = settings.database.get_pool().await?;
        let email_client = settings.email_client.get_email_client()?;
        let storage = settings.application.get_upload_storage()?;

        let state = AppState {
            pool: Arc::new(pool),
            email_client: Arc::new(email_client),
            storage: Arc::new(storage),
            admin_token: settings.application.get_admin_token(),
            static_directory: StaticDirectory::new(&settings.application.static_directory),
        };

        Ok(Self::new(tcp_listener, state))
    }

    pub fn new(tcp_listener: TcpListener, state: AppState) -> Self {
        let body_limit = state.storage.max_file_bytes() + FORM_OVERHEAD_BYTES;

        // 관리자 API에만 토큰 검사를 적용한다.
        let admin_api = Router::new()
            .route("/api/candidaturas", routing::get(list_applications))
            .route("/api/download/:id", routing::get(download_resume))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                reject_invalid_admin_token,
            ));

        let router = Router::new()
            .route("/", routing::get(index_page))
            .route("/admin", routing::get(admin_page))
            .route("/health_check", routing::get(health_check))
            .route(
                "/submit",
                routing::post(submit).layer(DefaultBodyLimit::max(body_limit)),
            )
            .merge(admin_api)
            .nest_service("/static", ServeDir::new(state.static_directory.path()))
            .layer(TraceLayer::new_for_http().make_span_with(AddRequestID))
            .with_state(state);

        Self {
            tcp_listener,
            router,
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.tcp_listener.local_addr()
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on {}", self.tcp_listener.local_addr()?);
        // 클라이언트 주소를 `ConnectInfo`로 꺼낼 수 있게 한다.
        axum::serve(
            self.tcp_listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install the Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install the SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down");
}

// https://docs.rs/tower-http/0.5.2/src/tower_http/trace/make_span.rs.html#65-68의 코드를 참조했음
#[derive(Clone)]
struct AddRequestID;

impl MakeSpan<Body> for AddRequestID {
    fn make_span(&mut self, request: &Request<Body>) -> Span {
        tracing::span!(
            Level::INFO,
            "request",
            request_id = %uuid::Uuid::new_v4(),
            method = %request.method(),
            // 토큰이 로그에 남지 않도록 쿼리 문자열은 기록하지 않는다.
            uri = %request.uri().path(),
            version = ?request.version(),
            // 오류 응답을 만들 때 채운다.
            error = tracing::field::Empty,
            error_detail = tracing::field::Empty,
        )
    }
}
