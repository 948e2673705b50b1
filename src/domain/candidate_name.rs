use unicode_segmentation::UnicodeSegmentation;

use super::DomainError;

#[derive(Debug)]
pub struct CandidateName(String);

impl TryFrom<String> for CandidateName {
    type Error = DomainError;
    /// 입력이 지원자 이름에 대한 검증 조건을 모두 만족하면
    /// `Ok(CandidateName)`을 반환한다.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        // 앞뒤 공백은 저장하지 않는다.
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::MissingField("nome"));
        }

        // grapheme은 사용자가 인지할 수 있는 문자로서 유니코드 표준에 의해 정의된다.
        if s.graphemes(true).count() > 256 {
            return Err(DomainError::NameTooLong);
        }

        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for CandidateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
