use bytes::Bytes;
use unicode_normalization::UnicodeNormalization;

use super::DomainError;

/// 멀티파트 폼에서 꺼낸 파일 필드 그대로의 값
#[derive(Debug, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content: Bytes,
}

/// 허용하는 이력서 확장자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeExtension {
    Pdf,
    Doc,
    Docx,
}

impl ResumeExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeExtension::Pdf => "pdf",
            ResumeExtension::Doc => "doc",
            ResumeExtension::Docx => "docx",
        }
    }

    /// 첨부 파일과 다운로드에 사용할 MIME 타입
    pub fn content_type(&self) -> &'static str {
        match self {
            ResumeExtension::Pdf => "application/pdf",
            ResumeExtension::Doc => "application/msword",
            ResumeExtension::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl TryFrom<&str> for ResumeExtension {
    type Error = DomainError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "doc" => Ok(Self::Doc),
            "docx" => Ok(Self::Docx),
            _ => Err(DomainError::InvalidExtension),
        }
    }
}

/// 디스크에 써도 안전한 파일 이름
///
/// 경로 구분자를 포함한 앞부분은 버리고, ASCII 영숫자와 `.`, `_`, `-`만 남긴다.
/// 악센트가 붙은 글자는 NFKD로 분해해서 기본 글자를 남긴다(`í` => `i`).
/// 공백은 `_`로 바꾼다. 확장자는 소문자로 정규화한다.
#[derive(Debug, Clone)]
pub struct ResumeFileName {
    name: String,
    extension: ResumeExtension,
}

impl ResumeFileName {
    const FALLBACK_STEM: &'static str = "curriculo";

    pub fn extension(&self) -> ResumeExtension {
        self.extension
    }

    fn sanitize_stem(stem: &str) -> String {
        let sanitized: String = stem
            .nfkd()
            .filter_map(|c| {
                if c.is_whitespace() {
                    Some('_')
                } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    Some(c)
                } else {
                    None
                }
            })
            .collect();

        sanitized.trim_matches(|c| c == '.' || c == '_').to_string()
    }
}

impl TryFrom<String> for ResumeFileName {
    type Error = DomainError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        // 브라우저에 따라 전체 경로가 전달되기도 한다.
        let base_name = s
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        if base_name.is_empty() {
            return Err(DomainError::MissingResume);
        }

        let (stem, extension) = base_name
            .rsplit_once('.')
            .ok_or(DomainError::InvalidExtension)?;
        let extension = ResumeExtension::try_from(extension)?;

        let mut stem = Self::sanitize_stem(stem);
        if stem.is_empty() {
            stem = Self::FALLBACK_STEM.to_string();
        }

        Ok(Self {
            name: format!("{}.{}", stem, extension.as_str()),
            extension,
        })
    }
}

impl AsRef<str> for ResumeFileName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// 검증을 통과한 이력서 파일
#[derive(Debug)]
pub struct ResumeFile {
    pub file_name: ResumeFileName,
    pub content: Bytes,
}

impl ResumeFile {
    /// `max_bytes`보다 큰 파일은 거부한다.
    pub fn parse(uploaded: Option<UploadedFile>, max_bytes: usize) -> Result<Self, DomainError> {
        let UploadedFile { file_name, content } = uploaded.ok_or(DomainError::MissingResume)?;
        let file_name = file_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(DomainError::MissingResume)?;
        let file_name = ResumeFileName::try_from(file_name)?;

        if content.is_empty() {
            return Err(DomainError::EmptyResume);
        }
        if content.len() > max_bytes {
            return Err(DomainError::ResumeTooLarge { max_bytes });
        }

        Ok(Self { file_name, content })
    }

    pub fn content_type(&self) -> &'static str {
        self.file_name.extension().content_type()
    }
}
