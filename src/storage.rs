use std::{io::ErrorKind, path::PathBuf};

use chrono::{DateTime, Utc};
use tokio::{fs::File, io::AsyncWriteExt};
use uuid::Uuid;

use crate::domain::ResumeFile;

/// 디스크에 저장된 이력서의 위치
#[derive(Debug, Clone)]
pub struct StoredResume {
    /// 업로드 디렉토리 안의 파일 이름 (`<타임스탬프>_<원본 이름>`)
    pub file_name: String,
    pub path: PathBuf,
}

impl StoredResume {
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// 업로드된 이력서를 로컬 디렉토리에 저장한다.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    directory: PathBuf,
    max_file_bytes: usize,
}

impl UploadStorage {
    /// 디렉토리가 없으면 만든다.
    pub fn new(directory: impl Into<PathBuf>, max_file_bytes: usize) -> Result<Self, std::io::Error> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            max_file_bytes,
        })
    }

    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    fn stored_name(
        resume: &ResumeFile,
        submitted_at: &DateTime<Utc>,
        suffix: Option<&str>,
    ) -> String {
        let timestamp = submitted_at.format("%Y%m%d%H%M%S%6f");
        match suffix {
            Some(suffix) => format!("{}_{}_{}", timestamp, suffix, resume.file_name.as_ref()),
            None => format!("{}_{}", timestamp, resume.file_name.as_ref()),
        }
    }

    async fn create(&self, file_name: &str) -> Result<(PathBuf, File), std::io::Error> {
        let path = self.directory.join(file_name);
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        Ok((path, file))
    }

    /// 기존 파일은 덮어쓰지 않는다.
    /// 같은 이름이 이미 있으면 짧은 무작위 접미사를 붙여서 한 번 더 시도한다.
    #[tracing::instrument(name = "Store resume on disk", skip_all, fields(file_name = tracing::field::Empty))]
    pub async fn save(
        &self,
        resume: &ResumeFile,
        submitted_at: &DateTime<Utc>,
    ) -> Result<StoredResume, std::io::Error> {
        let file_name = Self::stored_name(resume, submitted_at, None);
        let (file_name, path, mut file) = match self.create(&file_name).await {
            Ok((path, file)) => (file_name, path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::warn!(file_name = %file_name, "The stored file name is taken. Adding a suffix");
                let suffix = Uuid::new_v4().simple().to_string();
                let file_name = Self::stored_name(resume, submitted_at, Some(&suffix[..8]));
                let (path, file) = self.create(&file_name).await?;
                (file_name, path, file)
            }
            Err(e) => return Err(e),
        };
        tracing::Span::current().record("file_name", tracing::field::display(&file_name));

        file.write_all(&resume.content).await?;
        file.flush().await?;

        Ok(StoredResume { file_name, path })
    }

    #[tracing::instrument(name = "Remove stored resume", skip_all)]
    pub async fn remove(&self, stored: &StoredResume) -> Result<(), std::io::Error> {
        tokio::fs::remove_file(&stored.path).await
    }
}
