/// 마켓 코어 에러 타입
/// HTTP 계층은 `status_class` 를 보고 응답 코드를 정한다.
// region:    --- Imports
use thiserror::Error;
// endregion: --- Imports

// region:    --- Error
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("{entity} 을(를) 찾을 수 없습니다: id {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} 을(를) 찾을 수 없습니다: code {code}")]
    NotFoundByCode { entity: &'static str, code: String },

    #[error("경매 {auction_id} 의 상태가 올바르지 않습니다: {reason}")]
    InvalidState { auction_id: i64, reason: String },

    #[error("입찰 금액 {value} 이(가) 현재 최고 입찰가 {leading} 보다 높지 않습니다.")]
    BidTooLow { value: i64, leading: i64 },

    #[error("등록되지 않은 상품 종류입니다: {0}")]
    UnknownKind(String),

    #[error("제약 조건 위반: {0}")]
    ConstraintViolation(String),

    #[error("잘못된 상품 데이터: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("설정 오류: {0}")]
    Config(String),

    #[error("데이터베이스 오류: {0}")]
    Database(#[source] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, MarketError>;

impl MarketError {
    /// HTTP 응답 코드 힌트
    pub fn status_class(&self) -> u16 {
        match self {
            MarketError::NotFound { .. } | MarketError::NotFoundByCode { .. } => 404,
            MarketError::BidTooLow { .. }
            | MarketError::InvalidState { .. }
            | MarketError::InvalidPayload(_) => 400,
            _ => 500,
        }
    }
}

impl From<sqlx::Error> for MarketError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation()
                || db_err.is_foreign_key_violation()
                || db_err.is_check_violation()
            {
                return MarketError::ConstraintViolation(db_err.message().to_string());
            }
        }
        MarketError::Database(err)
    }
}
// endregion: --- Error
