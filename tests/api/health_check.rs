use crate::helpers::TestApp;

// `tokio::test`는 테스팅에 있어서 `tokio::main`과 동등하다.
#[tokio::test]
async fn health_check_works() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;

    // 실행
    let response = test_app.get("health_check").await;

    // 확인
    assert_eq!(response.status(), http::StatusCode::OK);
    assert_eq!(Some(0), response.content_length());

    Ok(())
}
