use futures_util::TryFutureExt;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::{
    database::{ApplicationRecord, CurriculosDB, CurriculosDBError, ResumeLocation},
    domain::NewApplication,
    settings::DatabaseSettings,
    storage::StoredResume,
};

use super::query::{
    sqlite_get_resume_location, sqlite_insert_application, sqlite_list_applications,
};

#[derive(Clone)]
pub struct SqliteDBPool {
    pool: SqlitePool,
}

impl AsRef<SqlitePool> for SqliteDBPool {
    fn as_ref(&self) -> &SqlitePool {
        // 호출자는 읽기 전용으로 접근할 수 있으며, 이는 불변량을 깨뜨리지 못한다.
        &self.pool
    }
}

impl SqliteDBPool {
    /// 첫 쿼리를 실행할 때 연결한다.
    #[tracing::instrument(name = "Connect to the SQLite database.", skip_all, fields(path = %database_settings.path))]
    pub fn connect(database_settings: &DatabaseSettings) -> Result<Self, CurriculosDBError> {
        let pool = SqlitePoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(2))
            .connect_lazy_with(database_settings.connect_options());
        Ok(Self { pool })
    }

    /// 테이블이 없으면 만든다.
    #[tracing::instrument(name = "Run database migrations.", skip_all)]
    pub async fn migrate(&self) -> Result<(), CurriculosDBError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl CurriculosDB for SqliteDBPool {
    #[tracing::instrument(name = "Saving new application details in the database.", skip_all)]
    async fn insert_application(
        &self,
        application: &NewApplication,
        stored: &StoredResume,
        ip: &str,
    ) -> Result<i64, CurriculosDBError> {
        sqlite_insert_application(&self.pool, application, stored, ip)
            .await
            .map_err(|e| {
                tracing::error!("Failed to execute query: {:?}", e);
                CurriculosDBError::InsertApplicationError(e)
            })
    }

    #[tracing::instrument(name = "List stored applications", skip_all)]
    async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, CurriculosDBError> {
        sqlite_list_applications(&self.pool)
            .map_err(CurriculosDBError::SqlxError)
            .await
    }

    #[tracing::instrument(name = "Get resume location", skip(self))]
    async fn get_resume_location(
        &self,
        application_id: i64,
    ) -> Result<Option<ResumeLocation>, CurriculosDBError> {
        sqlite_get_resume_location(&self.pool, application_id)
            .map_err(CurriculosDBError::SqlxError)
            .await
    }
}
