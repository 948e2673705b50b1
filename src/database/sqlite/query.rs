use sqlx::SqliteExecutor;

use crate::{
    database::{ApplicationRecord, ResumeLocation},
    domain::NewApplication,
    storage::StoredResume,
};

pub async fn sqlite_insert_application(
    executor: impl SqliteExecutor<'_>,
    application: &NewApplication,
    stored: &StoredResume,
    ip: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO applications
            (name, email, phone, role, education, notes, file_name, file_path, ip, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?);
        "#,
    )
    .bind(application.name.as_ref())
    .bind(application.email.as_ref())
    .bind(application.phone.as_ref())
    .bind(application.role.as_ref())
    .bind(application.education.as_ref())
    .bind(&application.notes)
    .bind(application.resume.file_name.as_ref())
    .bind(stored.path_string())
    .bind(ip)
    .bind(application.submitted_at_rfc3339())
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn sqlite_list_applications(
    executor: impl SqliteExecutor<'_>,
) -> Result<Vec<ApplicationRecord>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRecord>(
        r#"
        SELECT id, name, email, phone, role, education, notes,
               file_name, file_path, ip, submitted_at
        FROM applications
        ORDER BY id DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn sqlite_get_resume_location(
    executor: impl SqliteExecutor<'_>,
    application_id: i64,
) -> Result<Option<ResumeLocation>, sqlx::Error> {
    sqlx::query_as::<_, ResumeLocation>(
        "SELECT file_name, file_path FROM applications WHERE id = ?",
    )
    .bind(application_id)
    .fetch_optional(executor)
    .await
}
