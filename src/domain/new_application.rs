use chrono::{DateTime, SecondsFormat, Utc};

use super::{CandidateEmail, CandidateName, ResumeFile, UploadedFile};

/// 검증 실패 사유
/// 메세지는 그대로 클라이언트에게 전달된다.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("Campo obrigatório: {0}")]
    MissingField(&'static str),
    #[error("E-mail inválido")]
    InvalidEmail(String),
    #[error("Nome muito longo")]
    NameTooLong,
    #[error("Arquivo do currículo é obrigatório")]
    MissingResume,
    #[error("Extensão inválida. Use .pdf, .doc ou .docx")]
    InvalidExtension,
    #[error("Arquivo vazio")]
    EmptyResume,
    #[error("Arquivo excede {}", size_label(.max_bytes))]
    ResumeTooLarge { max_bytes: usize },
}

// 1048576 => "1MB", 1536 => "1KB"
fn size_label(bytes: &usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    match *bytes {
        b if b >= MB && b % MB == 0 => format!("{}MB", b / MB),
        b if b >= KB => format!("{}KB", b / KB),
        b => format!("{} bytes", b),
    }
}

/// 앞뒤 공백을 제거하고 비어 있지 않은 텍스트
#[derive(Debug)]
pub struct RequiredText(String);

impl RequiredText {
    pub fn parse(value: Option<String>, field: &'static str) -> Result<Self, DomainError> {
        match value.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Ok(Self(s.to_string())),
            _ => Err(DomainError::MissingField(field)),
        }
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 멀티파트 폼에서 모은 원본 입력
#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub education: Option<String>,
    pub notes: Option<String>,
    pub resume: Option<UploadedFile>,
}

#[derive(Debug)]
pub struct NewApplication {
    pub name: CandidateName,
    pub email: CandidateEmail,
    pub phone: RequiredText,
    pub role: RequiredText,
    pub education: RequiredText,
    pub notes: String,
    pub resume: ResumeFile,
    pub submitted_at: DateTime<Utc>,
}

impl NewApplication {
    /// 폼의 필드 순서대로 검증해서 첫 번째 실패를 반환한다.
    pub fn parse(form: ApplicationForm, max_resume_bytes: usize) -> Result<Self, DomainError> {
        let ApplicationForm {
            name,
            email,
            phone,
            role,
            education,
            notes,
            resume,
        } = form;

        let name = CandidateName::try_from(name.ok_or(DomainError::MissingField("nome"))?)?;
        let email = CandidateEmail::try_from(email.ok_or(DomainError::MissingField("email"))?)?;
        let phone = RequiredText::parse(phone, "telefone")?;
        let role = RequiredText::parse(role, "cargo")?;
        let education = RequiredText::parse(education, "escolaridade")?;
        let resume = ResumeFile::parse(resume, max_resume_bytes)?;

        Ok(Self {
            name,
            email,
            phone,
            role,
            education,
            notes: notes.unwrap_or_default().trim().to_string(),
            resume,
            submitted_at: Utc::now(),
        })
    }

    /// `2024-05-01T12:30:00Z` 형식
    pub fn submitted_at_rfc3339(&self) -> String {
        self.submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
