use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, Secret};

use crate::routes::AdminError;

/// 관리자 API를 여는 공유 비밀값
///
/// 비밀값이 설정되지 않았거나 비어 있으면 어떤 토큰도 통과하지 못한다.
#[derive(Clone)]
pub struct AdminToken(Option<Arc<Secret<String>>>);

impl AdminToken {
    pub fn new(secret: Option<&Secret<String>>) -> Self {
        let secret = secret
            .map(|secret| secret.expose_secret())
            .filter(|secret| !secret.is_empty())
            .map(|secret| Arc::new(Secret::new(secret.to_string())));
        Self(secret)
    }

    pub fn verify(&self, candidate: Option<&str>) -> bool {
        match (&self.0, candidate) {
            (Some(expected), Some(candidate)) => {
                constant_time_eq(expected.expose_secret().as_bytes(), candidate.as_bytes())
            }
            _ => false,
        }
    }
}

// 일치하는 앞부분의 길이로 토큰을 추측하지 못하게 끝까지 비교한다.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(serde::Deserialize)]
pub struct TokenQuery {
    token: Option<String>,
}

/// `?token=` 쿼리가 관리자 토큰과 다르면 핸들러를 실행하지 않고 401을 반환한다.
pub async fn reject_invalid_admin_token(
    State(admin_token): State<AdminToken>,
    query: Result<Query<TokenQuery>, axum::extract::rejection::QueryRejection>,
    request: Request,
    next: Next,
) -> Result<Response, AdminError> {
    let candidate = query.ok().and_then(|Query(query)| query.token);
    if admin_token.verify(candidate.as_deref()) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Rejected an admin request with an invalid token");
        Err(AdminError::Unauthorized)
    }
}
