mod base;

use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;

pub use base::{EmailClientError, EmailOutcome};

use crate::{
    domain::NewApplication,
    settings::{EmailBackend, EmailClientSettings},
    storage::StoredResume,
};

enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

impl Transport {
    fn kind(&self) -> &'static str {
        match self {
            Transport::Smtp(_) => "smtp",
            Transport::File(_) => "file",
        }
    }
}

struct Delivery {
    transport: Transport,
    sender: Mailbox,
    recipient: Mailbox,
}

/// 새 지원서가 들어오면 이력서를 첨부해서 담당자에게 알린다.
pub struct EmailClient {
    // `None`이면 전송하지 않는다.
    delivery: Option<Delivery>,
}

// 전송 객체는 `Debug`를 구현하지 않으므로 종류와 주소만 보여준다.
impl std::fmt::Debug for EmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.delivery {
            None => f.write_str("EmailClient(disabled)"),
            Some(delivery) => f
                .debug_struct("EmailClient")
                .field("transport", &delivery.transport.kind())
                .field("sender", &delivery.sender.to_string())
                .field("recipient", &delivery.recipient.to_string())
                .finish(),
        }
    }
}

impl EmailClient {
    pub fn disabled() -> Self {
        Self { delivery: None }
    }

    pub fn from_email_client_settings(
        settings: &EmailClientSettings,
    ) -> Result<Self, EmailClientError> {
        let username = settings
            .smtp_username
            .as_deref()
            .filter(|username| !username.is_empty());

        let transport = match settings.backend {
            EmailBackend::Disabled => return Ok(Self::disabled()),
            EmailBackend::File => {
                std::fs::create_dir_all(&settings.outbox_directory)?;
                Transport::File(AsyncFileTransport::<Tokio1Executor>::new(
                    &settings.outbox_directory,
                ))
            }
            EmailBackend::Smtp => {
                let password = settings
                    .smtp_password
                    .as_ref()
                    .filter(|password| !password.expose_secret().is_empty());
                let (Some(username), Some(password)) = (username, password) else {
                    tracing::warn!("SMTP credentials are not set. Emails will not be sent.");
                    return Ok(Self::disabled());
                };

                Transport::Smtp(
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)?
                        .port(settings.smtp_port)
                        .credentials(Credentials::new(
                            username.to_string(),
                            password.expose_secret().to_string(),
                        ))
                        .timeout(Some(settings.timeout()))
                        .build(),
                )
            }
        };

        let sender = settings
            .sender_email
            .as_deref()
            .filter(|sender| !sender.is_empty())
            .or(username)
            .ok_or(EmailClientError::MissingSender)?
            .parse::<Mailbox>()?;
        let recipient = settings.recipient_email.parse::<Mailbox>()?;

        Ok(Self {
            delivery: Some(Delivery {
                transport,
                sender,
                recipient,
            }),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.delivery.is_some()
    }

    #[tracing::instrument(
        name = "Send application notice",
        skip_all,
        fields(stored_file = %stored.file_name)
    )]
    pub async fn send_application_notice(
        &self,
        application: &NewApplication,
        stored: &StoredResume,
        ip: &str,
    ) -> Result<EmailOutcome, EmailClientError> {
        let Some(delivery) = &self.delivery else {
            tracing::warn!("Email delivery is disabled. Skipping the application notice.");
            return Ok(EmailOutcome::Skipped);
        };

        let message = Message::builder()
            .from(delivery.sender.clone())
            .to(delivery.recipient.clone())
            .subject(notice_subject(application))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(notice_body(application, ip)))
                    .singlepart(Attachment::new(stored.file_name.clone()).body(
                        application.resume.content.to_vec(),
                        ContentType::parse(application.resume.content_type())?,
                    )),
            )?;

        match &delivery.transport {
            Transport::Smtp(transport) => {
                transport.send(message).await?;
            }
            Transport::File(transport) => {
                transport.send(message).await?;
            }
        }

        Ok(EmailOutcome::Sent)
    }
}

fn notice_subject(application: &NewApplication) -> String {
    format!(
        "Nova candidatura: {} - {}",
        application.name.as_ref(),
        application.role.as_ref()
    )
}

fn notice_body(application: &NewApplication, ip: &str) -> String {
    let notes = if application.notes.is_empty() {
        "-"
    } else {
        application.notes.as_str()
    };

    format!(
        "Nome: {}\n\
         E-mail: {}\n\
         Telefone: {}\n\
         Cargo Desejado: {}\n\
         Escolaridade: {}\n\
         Observações: {}\n\
         IP: {}\n\
         Enviado em: {}\n",
        application.name.as_ref(),
        application.email.as_ref(),
        application.phone.as_ref(),
        application.role.as_ref(),
        application.education.as_ref(),
        notes,
        ip,
        application.submitted_at_rfc3339(),
    )
}
