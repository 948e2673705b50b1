use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// 정적 페이지가 있는 디렉토리
#[derive(Clone)]
pub struct StaticDirectory(Arc<PathBuf>);

impl StaticDirectory {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self(Arc::new(directory.into()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

// `ServeFile`은 실패하지 않는다.
async fn serve_file(path: PathBuf, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(infallible) => match infallible {},
    }
}

// curl -v http://127.0.0.1:5000/
pub async fn index_page(
    State(static_directory): State<StaticDirectory>,
    request: Request,
) -> Response {
    serve_file(static_directory.file("index.html"), request).await
}

// 관리자 화면 파일이 없으면 안내 문구와 함께 404를 반환한다.
pub async fn admin_page(
    State(static_directory): State<StaticDirectory>,
    request: Request,
) -> Response {
    let path = static_directory.file("admin.html");
    let exists = tokio::fs::metadata(&path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false);
    if !exists {
        return (
            http::StatusCode::NOT_FOUND,
            "Painel indisponível: crie static/admin.html.",
        )
            .into_response();
    }

    serve_file(path, request).await
}
