use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, Request, State},
    response::Response,
};
use http::{header::CONTENT_DISPOSITION, HeaderValue};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::{database::CurriculosDB, settings::DefaultDBPool};

use super::AdminError;

// `curl -OJ 'http://127.0.0.1:5000/api/download/1?token=...'`
// 없는 id, 숫자가 아닌 id, 디스크에서 사라진 파일 => 404
#[tracing::instrument(name = "Download a stored resume.", skip_all, fields(application_id = tracing::field::Empty))]
pub async fn download_resume(
    State(pool): State<Arc<DefaultDBPool>>,
    application_id: Result<Path<i64>, PathRejection>,
    request: Request,
) -> Result<Response, AdminError> {
    let Ok(Path(application_id)) = application_id else {
        return Err(AdminError::NotFound);
    };
    tracing::Span::current().record("application_id", application_id);

    let location = pool
        .get_resume_location(application_id)
        .await
        .context("Failed to look up the resume location.")?
        .ok_or(AdminError::NotFound)?;

    let path = PathBuf::from(&location.file_path);
    let exists = tokio::fs::metadata(&path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false);
    if !exists {
        tracing::warn!(file_path = %location.file_path, "The stored resume is missing on disk");
        return Err(AdminError::NotFound);
    }

    // 파일은 스트리밍으로 전송된다.
    let mut response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .context("Failed to serve the resume.")?
        .map(Body::new);

    let content_disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", location.file_name))
            .context("The stored file name is not a valid header value.")?;
    response
        .headers_mut()
        .insert(CONTENT_DISPOSITION, content_disposition);

    Ok(response)
}
