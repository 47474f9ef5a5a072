/// 환경 변수 기반 설정
/// `.env` 파일이 있으면 먼저 읽고, 없으면 프로세스 환경 변수만 사용한다.
// region:    --- Imports
use crate::error::{MarketError, Result};
use std::time::Duration;
// endregion: --- Imports

// region:    --- Config
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub sweep_interval: Duration,
    pub reset_database: bool,
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정 생성
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| MarketError::Config("DATABASE_URL 설정이 필요합니다".to_string()))?;

        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let sweep_secs = parse_or(&lookup, "SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS)?;
        let reset_database = parse_or(&lookup, "RESET_DATABASE", false)?;
        if sweep_secs == 0 {
            return Err(MarketError::Config(
                "SWEEP_INTERVAL_SECS 는 0보다 커야 합니다".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
            sweep_interval: Duration::from_secs(sweep_secs),
            reset_database,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| MarketError::Config(format!("{key} 값이 올바르지 않습니다: {raw}"))),
        None => Ok(default),
    }
}
// endregion: --- Config
