use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        ConnectInfo, Multipart, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use http::{HeaderMap, StatusCode};
use tracing::field::display;

use crate::{
    database::CurriculosDB,
    domain::{ApplicationForm, DomainError, NewApplication, UploadedFile},
    email_client::{EmailClient, EmailOutcome},
    settings::DefaultDBPool,
    storage::UploadStorage,
    utils::{error_chain_fmt, json_error, AppError500},
};

/// `POST /submit` 성공 응답
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SubmitResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_enviado: Option<bool>,
    pub mensagem: String,
}

impl SubmitResponse {
    fn saved(email_outcome: Result<EmailOutcome, ()>) -> Self {
        let (email_enviado, mensagem) = match email_outcome {
            Ok(EmailOutcome::Sent) => (true, "Candidatura enviada com sucesso!"),
            Ok(EmailOutcome::Skipped) => (false, "Dados salvos. Envio de e-mail desativado."),
            Err(()) => (false, "Dados salvos. Falha ao enviar e-mail."),
        };
        Self {
            ok: true,
            email_enviado: Some(email_enviado),
            mensagem: mensagem.to_string(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    ValidationError(#[from] DomainError),
    #[error("Failed to read the multipart body")]
    MultipartError(#[source] MultipartError),
    #[error("The request is not a multipart form")]
    MultipartRejection(#[from] MultipartRejection),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

// 같은 로직을 사용해서 `Debug`에 대한 모든 오류 체인을 얻는다.
impl std::fmt::Debug for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SubmitError {
    // 본문 크기 제한에 걸린 경우도 파일 크기 오류와 같은 응답을 준다.
    fn from_multipart_error(error: MultipartError, max_bytes: usize) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SubmitError::ValidationError(DomainError::ResumeTooLarge { max_bytes })
        } else {
            SubmitError::MultipartError(error)
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        tracing::Span::current()
            .record("error", tracing::field::display(&self))
            .record("error_detail", tracing::field::debug(&self));

        match self {
            SubmitError::ValidationError(e) => {
                tracing::warn!(error = %e, "Rejected an invalid application");
                let status = match e {
                    DomainError::ResumeTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                json_error(status, e.to_string())
            }
            SubmitError::MultipartError(e) => {
                tracing::warn!(error = %e, error_detail = ?e);
                json_error(e.status(), "Formulário inválido")
            }
            SubmitError::MultipartRejection(e) => {
                tracing::warn!(error = %e, error_detail = ?e);
                json_error(e.status(), "Formulário inválido")
            }
            SubmitError::UnexpectedError(e) => AppError500::new(e).into_response(),
        }
    }
}

/// `X-Forwarded-For`의 첫 번째 주소, 없으면 접속한 주소를 사용한다.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "0.0.0.0".to_string())
}

// 폼 필드 이름은 기존 화면이 쓰는 포르투갈어 이름과 영어 이름을 모두 받는다.
async fn read_application_form(mut multipart: Multipart) -> Result<ApplicationForm, MultipartError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "nome" | "name" => form.name = Some(field.text().await?),
            "email" => form.email = Some(field.text().await?),
            "telefone" | "phone" => form.phone = Some(field.text().await?),
            "cargo" | "role" => form.role = Some(field.text().await?),
            "escolaridade" | "education" => form.education = Some(field.text().await?),
            "observacoes" | "notes" => form.notes = Some(field.text().await?),
            "arquivo" | "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content = field.bytes().await?;
                form.resume = Some(UploadedFile { file_name, content });
            }
            other => tracing::debug!(field = %other, "Ignoring an unknown form field"),
        }
    }

    Ok(form)
}

// `curl -F nome=Ana -F email=ana@example.com -F telefone=1199 -F cargo=Dev \
//       -F escolaridade=Superior -F arquivo=@cv.pdf http://127.0.0.1:5000/submit`
// => 200 {"ok":true,"email_enviado":true,"mensagem":"Candidatura enviada com sucesso!"}
// 필수 필드 누락, 허용하지 않는 확장자 => 400
// 1MB를 넘는 파일 => 413
#[tracing::instrument(
    name = "Adding a new application.",
    skip_all,
    fields(
        candidate_email = tracing::field::Empty,
        candidate_role = tracing::field::Empty,
        application_id = tracing::field::Empty,
    )
)]
pub async fn submit(
    State(pool): State<Arc<DefaultDBPool>>,
    State(email_client): State<Arc<EmailClient>>,
    State(storage): State<Arc<UploadStorage>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    // 본문을 소비하는 추출자는 마지막으로 가야 한다.
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmitResponse>, SubmitError> {
    let max_bytes = storage.max_file_bytes();
    let form = read_application_form(multipart?)
        .await
        .map_err(|e| SubmitError::from_multipart_error(e, max_bytes))?;
    // 검증을 모두 통과하기 전에는 디스크와 데이터베이스에 아무것도 쓰지 않는다.
    let application = NewApplication::parse(form, max_bytes)?;

    tracing::Span::current()
        .record("candidate_email", display(application.email.as_ref()))
        .record("candidate_role", display(application.role.as_ref()));

    let ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));

    let stored = storage
        .save(&application.resume, &application.submitted_at)
        .await
        .context("Failed to store the resume on disk.")?;

    let application_id = match pool.insert_application(&application, &stored, &ip).await {
        Ok(application_id) => application_id,
        Err(e) => {
            // 행이 없는 파일은 남기지 않는다.
            if let Err(remove_error) = storage.remove(&stored).await {
                tracing::error!(
                    error.cause_chain = ?remove_error,
                    error.message = %remove_error,
                    "Failed to remove an orphaned resume",
                );
            }
            return Err(anyhow::Error::from(e)
                .context("Failed to insert the application in the database.")
                .into());
        }
    };
    tracing::Span::current().record("application_id", application_id);

    // 메일 전송 실패는 접수 실패가 아니다.
    let email_outcome = email_client
        .send_application_notice(&application, &stored, &ip)
        .await
        .map_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to send the application notice.",
            );
        });

    Ok(Json(SubmitResponse::saved(email_outcome)))
}
