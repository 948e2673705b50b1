use claim::assert_none;
use curriculos::settings::EmailBackend;
use secrecy::Secret;

use crate::helpers::{DefaultDBPoolTestExt, TestApp, TestForm, PDF_CONTENT};

#[tokio::test]
async fn submit_returns_a_200_and_persists_a_valid_application() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    let response = test_app
        .post_submit(TestForm::valid().into_multipart())
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["ok"], true);
    assert_eq!(body["email_enviado"], true);
    assert_eq!(body["mensagem"], "Candidatura enviada com sucesso!");

    let saved = test_app.pool.stored_applications().await?;
    assert_eq!(saved.len(), 1);
    let saved = &saved[0];
    assert_eq!(saved.name, "Ana Souza");
    assert_eq!(saved.email, "ana.souza@example.com");
    assert_eq!(saved.phone, "(11) 98888-7777");
    assert_eq!(saved.role, "Desenvolvedora");
    assert_eq!(saved.education, "Superior completo");
    assert_eq!(saved.notes, "Disponível para início imediato");
    assert_eq!(saved.file_name, "cv.pdf");
    assert_eq!(saved.ip, "127.0.0.1");

    // 파일은 `<타임스탬프>_<파일 이름>`으로 업로드 디렉토리에 저장된다.
    let uploaded = test_app.uploaded_files();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0], std::path::PathBuf::from(&saved.file_path));
    let stored_name = uploaded[0]
        .file_name()
        .and_then(|name| name.to_str())
        .expect("The stored file has no name");
    assert!(stored_name.ends_with("_cv.pdf"));
    assert_eq!(stored_name.len(), "20240501123000000000_cv.pdf".len());
    assert_eq!(std::fs::read(&saved.file_path)?, PDF_CONTENT);

    Ok(())
}

#[tokio::test]
async fn submit_sends_a_notice_with_the_resume_attached() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    test_app
        .post_submit(TestForm::valid().into_multipart())
        .await
        .error_for_status()?;

    // 확인
    let emails = test_app.outbox_emails();
    assert_eq!(emails.len(), 1);
    let email = &emails[0];
    assert!(email.contains("Subject: Nova candidatura: Ana Souza - Desenvolvedora"));
    assert!(email.contains("To: vagas@example.com"));
    assert!(email.contains("application/pdf"));
    // 첨부 파일 이름은 저장된 파일 이름과 같다.
    let uploaded = test_app.uploaded_files();
    let stored_name = uploaded[0]
        .file_name()
        .and_then(|name| name.to_str())
        .expect("The stored file has no name");
    assert!(email.contains(stored_name));

    Ok(())
}

#[tokio::test]
async fn submit_accepts_english_field_names() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    let response = test_app
        .post_submit(TestForm::valid().with_english_names().into_multipart())
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let saved = test_app.pool.stored_applications().await?;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].role, "Desenvolvedora");

    Ok(())
}

#[tokio::test]
async fn submit_allows_missing_notes() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    let response = test_app
        .post_submit(TestForm::valid().without_field("observacoes").into_multipart())
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let saved = test_app.pool.stored_applications().await?;
    assert_eq!(saved[0].notes, "");

    Ok(())
}

#[tokio::test]
async fn submit_returns_a_400_when_a_required_field_is_missing() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;
    let test_cases = ["nome", "email", "telefone", "cargo", "escolaridade"];

    for field in test_cases {
        // 실행
        let missing = test_app
            .post_submit(TestForm::valid().without_field(field).into_multipart())
            .await;
        let blank = test_app
            .post_submit(TestForm::valid().with_field(field, "   ").into_multipart())
            .await;

        // 확인
        for response in [missing, blank] {
            assert_eq!(
                response.status(),
                reqwest::StatusCode::BAD_REQUEST,
                "The API did not fail with 400 Bad Request when `{}` was missing.",
                field
            );
            let body: serde_json::Value = response.json().await?;
            assert_eq!(body["ok"], false);
            assert_eq!(body["error"], format!("Campo obrigatório: {}", field));
        }
    }

    // 아무것도 남지 않는다.
    assert_eq!(test_app.pool.count_applications().await?, 0);
    assert!(test_app.uploaded_files().is_empty());
    assert!(test_app.outbox_emails().is_empty());

    Ok(())
}

#[tokio::test]
async fn submit_returns_a_400_when_the_resume_is_missing() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    let response = test_app
        .post_submit(TestForm::valid().without_file().into_multipart())
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "Arquivo do currículo é obrigatório");
    assert_eq!(test_app.pool.count_applications().await?, 0);

    Ok(())
}

#[tokio::test]
async fn submit_returns_a_400_for_a_disallowed_extension() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;
    let test_cases = ["cv.exe", "cv.txt", "cv.pdf.sh", "curriculo"];

    for file_name in test_cases {
        // 실행
        let response = test_app
            .post_submit(
                TestForm::valid()
                    .with_file(file_name, PDF_CONTENT.to_vec())
                    .into_multipart(),
            )
            .await;

        // 확인
        assert_eq!(
            response.status(),
            reqwest::StatusCode::BAD_REQUEST,
            "The API accepted `{}`.",
            file_name
        );
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"], "Extensão inválida. Use .pdf, .doc ou .docx");
    }

    assert_eq!(test_app.pool.count_applications().await?, 0);
    assert!(test_app.uploaded_files().is_empty());

    Ok(())
}

#[tokio::test]
async fn submit_accepts_uppercase_extensions() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    let response = test_app
        .post_submit(
            TestForm::valid()
                .with_file("CV FINAL.DOCX", b"docx bytes".to_vec())
                .into_multipart(),
        )
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let saved = test_app.pool.stored_applications().await?;
    // 공백 같은 안전하지 않은 문자는 파일 이름에서 바뀐다.
    assert!(!saved[0].file_name.contains(' '));
    assert!(saved[0].file_name.to_lowercase().ends_with(".docx"));

    Ok(())
}

#[tokio::test]
async fn submit_returns_a_400_for_an_invalid_email() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    let response = test_app
        .post_submit(
            TestForm::valid()
                .with_field("email", "ana.souza")
                .into_multipart(),
        )
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "E-mail inválido");
    assert_eq!(test_app.pool.count_applications().await?, 0);

    Ok(())
}

#[tokio::test]
async fn submit_returns_a_413_when_the_resume_is_too_large() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app_with(|settings| {
        settings.application.max_upload_bytes = 1024;
    })
    .await?;

    // 실행
    let response = test_app
        .post_submit(
            TestForm::valid()
                .with_file("cv.pdf", vec![b'a'; 2048])
                .into_multipart(),
        )
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Arquivo excede 1KB");
    assert_eq!(test_app.pool.count_applications().await?, 0);
    assert!(test_app.uploaded_files().is_empty());

    Ok(())
}

#[tokio::test]
async fn submit_returns_a_413_when_the_body_exceeds_the_request_limit(
) -> Result<(), anyhow::Error> {
    // 준비
    // 본문 한도는 파일 한도에 64KiB를 더한 값이다.
    let test_app = TestApp::spawn_app_with(|settings| {
        settings.application.max_upload_bytes = 1024;
    })
    .await?;

    // 실행
    let response = test_app
        .post_submit(
            TestForm::valid()
                .with_file("cv.pdf", vec![b'a'; 300 * 1024])
                .into_multipart(),
        )
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body, serde_json::json!({ "ok": false, "error": "Arquivo excede 1KB" }));
    assert_eq!(test_app.pool.count_applications().await?, 0);
    assert!(test_app.uploaded_files().is_empty());

    Ok(())
}

#[tokio::test]
async fn submit_accepts_a_resume_of_exactly_the_maximum_size() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app_with(|settings| {
        settings.application.max_upload_bytes = 1024;
    })
    .await?;

    // 실행
    let response = test_app
        .post_submit(
            TestForm::valid()
                .with_file("cv.pdf", vec![b'a'; 1024])
                .into_multipart(),
        )
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(test_app.pool.count_applications().await?, 1);

    Ok(())
}

#[tokio::test]
async fn submit_keeps_the_application_when_the_email_fails() -> Result<(), anyhow::Error> {
    // 준비
    // 아무도 듣고 있지 않은 포트를 고른다.
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    let test_app = TestApp::spawn_app_with(|settings| {
        settings.email_client.backend = EmailBackend::Smtp;
        settings.email_client.smtp_server = "127.0.0.1".into();
        settings.email_client.smtp_port = closed_port;
        settings.email_client.smtp_username = Some("curriculos@example.com".into());
        settings.email_client.smtp_password = Some(Secret::new("password".into()));
        settings.email_client.timeout_milliseconds = 1000;
    })
    .await?;

    // 실행
    let response = test_app
        .post_submit(TestForm::valid().into_multipart())
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["ok"], true);
    assert_eq!(body["email_enviado"], false);
    assert_eq!(body["mensagem"], "Dados salvos. Falha ao enviar e-mail.");
    assert_eq!(test_app.pool.count_applications().await?, 1);
    assert_eq!(test_app.uploaded_files().len(), 1);

    Ok(())
}

#[tokio::test]
async fn submit_reports_a_disabled_mailer() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app_with(|settings| {
        settings.email_client.backend = EmailBackend::Disabled;
    })
    .await?;

    // 실행
    let response = test_app
        .post_submit(TestForm::valid().into_multipart())
        .await;

    // 확인
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["email_enviado"], false);
    assert_eq!(body["mensagem"], "Dados salvos. Envio de e-mail desativado.");
    assert_eq!(test_app.pool.count_applications().await?, 1);

    Ok(())
}

#[tokio::test]
async fn submit_records_the_first_forwarded_address() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    test_app
        .post_submit_from(
            TestForm::valid().into_multipart(),
            "203.0.113.9, 10.0.0.1",
        )
        .await
        .error_for_status()?;

    // 확인
    let saved = test_app.pool.stored_applications().await?;
    assert_eq!(saved[0].ip, "203.0.113.9");

    Ok(())
}

#[tokio::test]
async fn submit_rejects_a_non_multipart_body() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    let response = reqwest::Client::new()
        .post(test_app.get_uri().join("submit")?)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("nome=Ana")
        .send()
        .await?;

    // 확인
    assert!(response.status().is_client_error());
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["ok"], false);
    assert_none!(body.get("email_enviado"));
    assert_eq!(test_app.pool.count_applications().await?, 0);

    Ok(())
}
