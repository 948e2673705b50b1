use std::time::Duration;

use secrecy::Secret;
use serde_aux::prelude::deserialize_number_from_string;
use sqlx::sqlite::SqliteConnectOptions;
use tokio::net::TcpListener;

use crate::{
    authentication::AdminToken,
    database::{sqlite::SqliteDBPool, CurriculosDBError},
    email_client::{EmailClient, EmailClientError},
    error::CurriculosError,
    startup::Server,
    storage::UploadStorage,
};

pub type DefaultDBPool = SqliteDBPool;

#[derive(serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
}

#[derive(serde::Deserialize)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// `index.html`, `admin.html`과 스크립트가 있는 디렉토리
    pub static_directory: String,
    pub upload_directory: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_upload_bytes: usize,
    /// 설정하지 않으면 관리자 API는 항상 401을 반환한다.
    #[serde(default)]
    pub admin_token: Option<Secret<String>>,
}

#[derive(serde::Deserialize)]
pub struct DatabaseSettings {
    /// SQLite 데이터베이스 파일 경로
    pub path: String,
    pub create_if_missing: bool,
}

#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailBackend {
    /// SMTP 서버로 전송한다.
    Smtp,
    /// `outbox_directory`에 `.eml` 파일로 저장한다.
    File,
    /// 아무것도 보내지 않는다.
    Disabled,
}

#[derive(serde::Deserialize)]
pub struct EmailClientSettings {
    pub backend: EmailBackend,
    pub smtp_server: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<Secret<String>>,
    /// 없으면 `smtp_username`을 발신자로 사용한다.
    #[serde(default)]
    pub sender_email: Option<String>,
    pub recipient_email: String,
    pub outbox_directory: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

/// 애플리케이션이 사용할 수 있는 런타임 환경
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

// 이전부터 사용하던 환경 변수 이름과 그에 대응하는 설정 키
const LEGACY_ENV_OVERRIDES: [(&str, &str); 8] = [
    ("UPLOAD_FOLDER", "application.upload_directory"),
    ("ADMIN_TOKEN", "application.admin_token"),
    ("DB_PATH", "database.path"),
    ("MAIL_TO", "email_client.recipient_email"),
    ("SMTP_SERVER", "email_client.smtp_server"),
    ("SMTP_PORT", "email_client.smtp_port"),
    ("SMTP_USER", "email_client.smtp_username"),
    ("SMTP_PASS", "email_client.smtp_password"),
];

impl Settings {
    pub fn get_settings() -> Result<Self, config::ConfigError> {
        let base_path =
            std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
        let settings_directory = base_path.join("settings");

        // 실행 환경을 식별한다.
        // 지정되지 않았으면 `local`로 기본 설정한다.
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str()
            .try_into()
            .map_err(config::ConfigError::Message)?;
        let environment_filename = format!("{}.json", environment.as_str());

        let mut builder = config::Config::builder()
            .add_source(config::File::from(settings_directory.join("base.json")))
            .add_source(config::File::from(
                settings_directory.join(environment_filename),
            ))
            // `APP_APPLICATION__PORT=5001` => `Settings.application.port`
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (variable, key) in LEGACY_ENV_OVERRIDES {
            builder = builder.set_override_option(key, std::env::var(variable).ok())?;
        }

        builder.build()?.try_deserialize::<Settings>()
    }

    pub async fn build_server(&self) -> Result<Server, CurriculosError> {
        Server::build(self).await
    }
}

impl ApplicationSettings {
    pub fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn get_listener(&self) -> Result<TcpListener, std::io::Error> {
        TcpListener::bind(self.get_address()).await
    }

    pub fn get_admin_token(&self) -> AdminToken {
        AdminToken::new(self.admin_token.as_ref())
    }

    pub fn get_upload_storage(&self) -> Result<UploadStorage, std::io::Error> {
        UploadStorage::new(&self.upload_directory, self.max_upload_bytes)
    }
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(self.create_if_missing)
            // 동시에 쓰기 요청이 들어오면 잠금이 풀릴 때까지 기다린다.
            .busy_timeout(Duration::from_secs(5))
    }

    pub async fn get_pool(&self) -> Result<DefaultDBPool, CurriculosDBError> {
        let pool = SqliteDBPool::connect(self)?;
        pool.migrate().await?;
        Ok(pool)
    }
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn get_email_client(&self) -> Result<EmailClient, EmailClientError> {
        EmailClient::from_email_client_settings(self)
    }
}

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<&str> for Environment {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
