use crate::{
    database::{ApplicationRecord, ResumeLocation},
    domain::NewApplication,
    storage::StoredResume,
    utils::error_chain_fmt,
};

#[derive(thiserror::Error)]
pub enum CurriculosDBError {
    #[error("CurriculosDB: Insert Application Error")]
    InsertApplicationError(#[source] sqlx::Error),
    #[error("CurriculosDB: Migration Error")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    // 그밖의 자세히 구분할 필요가 없는 오류들
    #[error(transparent)]
    SqlxError(#[from] sqlx::Error),
}

impl std::fmt::Debug for CurriculosDBError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

// DB 변경을 쉽게 하기 위한 트레이트
#[trait_variant::make(Send)]
pub trait CurriculosDB {
    /// 반환 값은 새 지원서의 id이다.
    async fn insert_application(
        &self,
        application: &NewApplication,
        stored: &StoredResume,
        ip: &str,
    ) -> Result<i64, CurriculosDBError>;

    /// 최신 지원서부터 모두 반환한다.
    async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, CurriculosDBError>;

    async fn get_resume_location(
        &self,
        application_id: i64,
    ) -> Result<Option<ResumeLocation>, CurriculosDBError>;
}
