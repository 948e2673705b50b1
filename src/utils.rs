use axum::{
    response::{IntoResponse, Response},
    Json,
};

pub fn error_chain_fmt(
    e: &dyn std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> Result<(), std::fmt::Error> {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// 클라이언트에게 돌려주는 실패 응답의 본문
/// `{"ok": false, "error": "..."}`
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

/// 상태 코드와 JSON 오류 본문으로 구성된 응답을 만든다.
pub fn json_error(status: http::StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(error))).into_response()
}

#[derive(thiserror::Error)]
#[error(transparent)]
pub struct AppError500(anyhow::Error);

impl std::fmt::Debug for AppError500 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for AppError500 {
    fn into_response(self) -> Response {
        tracing::Span::current()
            .record("error", tracing::field::display(&self))
            .record("error_detail", tracing::field::debug(&self));
        tracing::error!(error.cause_chain = ?self, error.message = %self, "Unexpected error");

        json_error(http::StatusCode::INTERNAL_SERVER_ERROR, "Erro interno")
    }
}

impl AppError500 {
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        AppError500(error.into())
    }
}
