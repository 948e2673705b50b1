use crate::{database::CurriculosDBError, email_client::EmailClientError, utils::error_chain_fmt};

// 오류 관리를 편하게 하기 위한 래퍼 타입
// 서버 구동과 테스트에서 오류 타입을 일치시킬 때 사용한다.
// 지역적으로 사용하는 에러는 사용하는 곳에 정의한다.
#[derive(thiserror::Error)]
pub enum CurriculosError {
    #[error("Email Client Error")]
    EmailClientError(#[from] EmailClientError),

    #[error("IO Error")]
    IOError(#[from] std::io::Error),

    #[error("Database Error")]
    DatabaseError(#[from] CurriculosDBError),

    #[error("Config Error")]
    ConfigError(#[from] config::ConfigError),
}

impl std::fmt::Debug for CurriculosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
