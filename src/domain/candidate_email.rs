use validator::ValidateEmail;

use super::DomainError;

#[derive(Debug)]
pub struct CandidateEmail(String);

impl TryFrom<String> for CandidateEmail {
    type Error = DomainError;
    fn try_from(s: String) -> Result<CandidateEmail, Self::Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::MissingField("email"));
        }
        if s.validate_email() {
            Ok(Self(s.to_string()))
        } else {
            Err(DomainError::InvalidEmail(s.to_string()))
        }
    }
}

impl AsRef<str> for CandidateEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
