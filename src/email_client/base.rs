use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum EmailClientError {
    #[error("EmailClient: Invalid Address")]
    AddressError(#[from] lettre::address::AddressError),
    #[error("EmailClient: Message Build Error")]
    MessageError(#[from] lettre::error::Error),
    #[error("EmailClient: Content Type Error")]
    ContentTypeError(#[from] lettre::message::header::ContentTypeErr),
    #[error("EmailClient: SMTP Error")]
    SmtpError(#[from] lettre::transport::smtp::Error),
    #[error("EmailClient: File Transport Error")]
    FileError(#[from] lettre::transport::file::Error),
    #[error("EmailClient: IO Error")]
    IOError(#[from] std::io::Error),
    #[error("EmailClient: No sender address configured")]
    MissingSender,
}

impl std::fmt::Debug for EmailClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// 전송 시도의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailOutcome {
    Sent,
    /// 메일 전송이 꺼져 있다.
    Skipped,
}
