use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, Json};

use crate::{
    database::{ApplicationRecord, CurriculosDB},
    settings::DefaultDBPool,
};

use super::AdminError;

/// `GET /api/candidaturas` 응답
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ApplicationList {
    pub ok: bool,
    pub rows: Vec<ApplicationRecord>,
}

// 토큰 검사는 `reject_invalid_admin_token` 미들웨어가 먼저 수행한다.
// `curl 'http://127.0.0.1:5000/api/candidaturas?token=...'`
#[tracing::instrument(name = "List applications for the admin.", skip_all)]
pub async fn list_applications(
    State(pool): State<Arc<DefaultDBPool>>,
) -> Result<Json<ApplicationList>, AdminError> {
    let rows = pool
        .list_applications()
        .await
        .context("Failed to fetch the stored applications.")?;

    Ok(Json(ApplicationList { ok: true, rows }))
}
