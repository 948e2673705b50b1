use axum::response::{IntoResponse, Response};

use crate::utils::{error_chain_fmt, json_error, AppError500};

#[derive(thiserror::Error)]
pub enum AdminError {
    #[error("AdminError: Unauthorized")]
    Unauthorized,
    #[error("AdminError: NotFound")]
    NotFound,
    #[error("AdminError: UnexpectedError")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            AdminError::Unauthorized => json_error(http::StatusCode::UNAUTHORIZED, "Não autorizado"),
            AdminError::NotFound => json_error(http::StatusCode::NOT_FOUND, "Não encontrado"),
            AdminError::UnexpectedError(e) => AppError500::new(e).into_response(),
        }
    }
}
