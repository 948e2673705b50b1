/// `applications` 테이블의 한 행
///
/// JSON 키는 관리자 화면이 사용하는 이름을 따른다.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize, serde::Deserialize)]
pub struct ApplicationRecord {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "cargo")]
    pub role: String,
    #[serde(rename = "escolaridade")]
    pub education: String,
    #[serde(rename = "observacoes")]
    pub notes: String,
    #[serde(rename = "arquivo_nome")]
    pub file_name: String,
    #[serde(rename = "arquivo_caminho")]
    pub file_path: String,
    pub ip: String,
    #[serde(rename = "enviado_em")]
    pub submitted_at: String,
}

/// 다운로드에 필요한 열만 모은 것
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResumeLocation {
    pub file_name: String,
    pub file_path: String,
}
