/// 경매 정리 스케줄러
/// 1. 유찰 정리: 입찰 없이 시작 시간이 지난 경매를 1일 연장 → 30일 연장 → 종료 순서로 처리
/// 2. 미확인 낙찰 복구: 판매자 승인 후 구매자가 기한 내 확인하지 않은 경매를 다시 입찰 가능 상태로 되돌림
/// 두 작업 모두 행(또는 작은 묶음) 단위 트랜잭션으로 처리하고, 잠근 뒤 조건을 다시 확인한다.
// region:    --- Imports
use crate::auction::model::{AuctionItem, AuctionStatus, BidStatus};
use crate::database::DatabaseManager;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::time::interval;
use tracing::{debug, error, info};
// endregion: --- Imports

// region:    --- Expiry Policy
/// 유찰 정리 대상 조회 범위 (일)
pub const EXPIRY_LOOKBACK_DAYS: i64 = 30;
/// 미확인 낙찰 복구 대상 조회 범위 (시간)
pub const REVERSAL_LOOKBACK_HOURS: i64 = 24;
/// 유찰 횟수 상한
pub const MAX_EXPIRED_COUNT: i16 = 3;

const REVERSAL_BATCH_SIZE: usize = 50;

/// 유찰 처리 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStep {
    Extend { days: i64, expired_count: i16 },
    Close,
}

/// 현재 유찰 횟수에 따른 다음 단계
/// 1회 → 30일 연장, 2회 → 종료, 그 외(없음/0) → 1일 연장
pub fn next_expiry_step(expired_count: Option<i16>) -> ExpiryStep {
    match expired_count {
        Some(1) => ExpiryStep::Extend {
            days: 30,
            expired_count: 2,
        },
        Some(count) if count >= 2 => ExpiryStep::Close,
        _ => ExpiryStep::Extend {
            days: 1,
            expired_count: 1,
        },
    }
}

/// 연장 후 시작 시간
/// 스케줄러가 오래 멈춰 있었더라도 연장된 시작 시간은 항상 `now` 이후가 된다.
pub fn extended_start(start: DateTime<Utc>, now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    start.max(now) + Duration::days(days)
}

/// 정리 작업 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub selected: usize,
    pub updated: usize,
    pub failed: usize,
}
// endregion: --- Expiry Policy

// region:    --- Queries
const SELECT_EXPIRY_CANDIDATES: &str = r#"
    SELECT id FROM auction_items
    WHERE status = $1 AND accept_id IS NULL AND COALESCE(expired_count, 0) < 3
      AND start_timestamp <= $2 AND start_timestamp >= $3
    ORDER BY id
"#;

const LOCK_EXPIRY_CANDIDATE: &str = r#"
    SELECT * FROM auction_items
    WHERE id = $1 AND status = $2 AND accept_id IS NULL AND COALESCE(expired_count, 0) < 3
      AND start_timestamp <= $3 AND start_timestamp >= $4
    FOR UPDATE
"#;

const EXTEND_AUCTION: &str = r#"
    UPDATE auction_items
    SET start_timestamp = $2, expired_count = $3, updated_at = $4
    WHERE id = $1
"#;

const CLOSE_EXPIRED_AUCTION: &str = r#"
    UPDATE auction_items
    SET status = $2, expired_count = 3, updated_at = $3
    WHERE id = $1
"#;

const SELECT_REVERSAL_CANDIDATES: &str = r#"
    SELECT id FROM auction_items
    WHERE buyer_timeout <= $1 AND buyer_timeout >= $2
      AND buyer_steps <= 2 AND seller_steps = 2
      AND status = $3 AND accept_id IS NOT NULL
    ORDER BY id
"#;

const LOCK_REVERSAL_BATCH: &str = r#"
    SELECT id, accept_id FROM auction_items
    WHERE id = ANY($1)
      AND buyer_timeout <= $2 AND buyer_timeout >= $3
      AND buyer_steps <= 2 AND seller_steps = 2
      AND status = $4 AND accept_id IS NOT NULL
    ORDER BY id
    FOR UPDATE
"#;

const REVERT_AUCTIONS: &str = r#"
    UPDATE auction_items
    SET status = $2, accept_id = NULL, seller_steps = 1, buyer_steps = 1, updated_at = $3
    WHERE id = ANY($1)
"#;

const VOID_DEFAULTED_BIDS: &str = r#"
    UPDATE auction_item_histories h
    SET status = $3, updated_at = $4
    FROM UNNEST($1::bigint[], $2::bigint[]) AS r(auction_item_id, user_id)
    WHERE h.auction_item_id = r.auction_item_id AND h.user_id = r.user_id AND h.status = $5
"#;
// endregion: --- Queries

// region:    --- Auction Scheduler
/// 경매 정리 스케줄러
pub struct AuctionScheduler {
    db_manager: Arc<DatabaseManager>,
    period: std::time::Duration,
}

impl AuctionScheduler {
    pub fn new(db_manager: Arc<DatabaseManager>, period: std::time::Duration) -> Self {
        Self { db_manager, period }
    }

    /// 정리 작업 주기 실행 시작
    pub async fn start(&self) {
        let pool = self.db_manager.get_pool();
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                let now = Utc::now();
                match sweep_expired(&pool, now).await {
                    Ok(report) => debug!("{:<12} --> 유찰 정리: {:?}", "Scheduler", report),
                    Err(e) => error!("{:<12} --> 유찰 정리 중 오류 발생: {:?}", "Scheduler", e),
                }
                match revert_unconfirmed(&pool, now).await {
                    Ok(report) => debug!("{:<12} --> 미확인 낙찰 복구: {:?}", "Scheduler", report),
                    Err(e) => error!(
                        "{:<12} --> 미확인 낙찰 복구 중 오류 발생: {:?}",
                        "Scheduler", e
                    ),
                }
            }
        });
    }

    /// 유찰 정리 1회 실행
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        sweep_expired(self.db_manager.pool(), now).await
    }

    /// 미확인 낙찰 복구 1회 실행
    pub async fn revert_unconfirmed(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        revert_unconfirmed(self.db_manager.pool(), now).await
    }
}

/// 유찰 정리
/// 행 하나의 실패는 기록만 하고 나머지를 계속 처리한다.
pub async fn sweep_expired(pool: &PgPool, now: DateTime<Utc>) -> Result<SweepReport> {
    let since = now - Duration::days(EXPIRY_LOOKBACK_DAYS);
    let ids = sqlx::query_scalar::<_, i64>(SELECT_EXPIRY_CANDIDATES)
        .bind(AuctionStatus::Open)
        .bind(now)
        .bind(since)
        .fetch_all(pool)
        .await?;

    let mut report = SweepReport {
        selected: ids.len(),
        ..Default::default()
    };

    for id in ids {
        match expire_auction(pool, id, now).await {
            Ok(true) => report.updated += 1,
            Ok(false) => debug!("{:<12} --> 이미 처리된 경매: id={}", "Scheduler", id),
            Err(e) => {
                report.failed += 1;
                error!("{:<12} --> 유찰 처리 실패: id={}, {:?}", "Scheduler", id, e);
            }
        }
    }

    if report.updated > 0 || report.failed > 0 {
        info!(
            "{:<12} --> 유찰 정리 완료: 대상 {}, 처리 {}, 실패 {}",
            "Scheduler", report.selected, report.updated, report.failed
        );
    }
    Ok(report)
}

/// 경매 하나를 잠그고 유찰 조건을 다시 확인한 뒤 처리
/// 그 사이 입찰이 들어왔거나 이미 처리된 경매면 `false`.
pub async fn expire_auction(pool: &PgPool, auction_id: i64, now: DateTime<Utc>) -> Result<bool> {
    let since = now - Duration::days(EXPIRY_LOOKBACK_DAYS);
    let mut tx = pool.begin().await?;

    let auction = sqlx::query_as::<_, AuctionItem>(LOCK_EXPIRY_CANDIDATE)
        .bind(auction_id)
        .bind(AuctionStatus::Open)
        .bind(now)
        .bind(since)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(auction) = auction else {
        tx.rollback().await?;
        return Ok(false);
    };

    match next_expiry_step(auction.expired_count) {
        ExpiryStep::Extend {
            days,
            expired_count,
        } => {
            // 조회 조건상 start_timestamp 는 항상 존재
            let start = auction.start_timestamp.unwrap_or(now);
            sqlx::query(EXTEND_AUCTION)
                .bind(auction_id)
                .bind(extended_start(start, now, days))
                .bind(expired_count)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }
        ExpiryStep::Close => {
            sqlx::query(CLOSE_EXPIRED_AUCTION)
                .bind(auction_id)
                .bind(AuctionStatus::Closed)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    Ok(true)
}

/// 미확인 낙찰 복구
/// 대상 경매를 작은 묶음으로 나눠 묶음마다 한 번의 UPDATE 로 되돌리고,
/// 기한을 넘긴 최고 입찰자의 입찰 기록은 무효 처리한다.
pub async fn revert_unconfirmed(pool: &PgPool, now: DateTime<Utc>) -> Result<SweepReport> {
    let since = now - Duration::hours(REVERSAL_LOOKBACK_HOURS);
    let ids = sqlx::query_scalar::<_, i64>(SELECT_REVERSAL_CANDIDATES)
        .bind(now)
        .bind(since)
        .bind(AuctionStatus::Bidding)
        .fetch_all(pool)
        .await?;

    let mut report = SweepReport {
        selected: ids.len(),
        ..Default::default()
    };

    for batch in ids.chunks(REVERSAL_BATCH_SIZE) {
        match revert_auctions(pool, batch, now).await {
            Ok(count) => report.updated += count,
            Err(e) => {
                report.failed += batch.len();
                error!(
                    "{:<12} --> 미확인 낙찰 복구 실패: ids={:?}, {:?}",
                    "Scheduler", batch, e
                );
            }
        }
    }

    if report.updated > 0 || report.failed > 0 {
        info!(
            "{:<12} --> 미확인 낙찰 복구 완료: 대상 {}, 처리 {}, 실패 {}",
            "Scheduler", report.selected, report.updated, report.failed
        );
    }
    Ok(report)
}

/// 주어진 경매들을 잠그고 복구 조건을 다시 확인한 뒤 한 번에 되돌린다
/// 그 사이 보증금이 확인되는 등 조건을 벗어난 경매는 건너뛴다.
pub async fn revert_auctions(pool: &PgPool, batch: &[i64], now: DateTime<Utc>) -> Result<usize> {
    let since = now - Duration::hours(REVERSAL_LOOKBACK_HOURS);
    let mut tx = pool.begin().await?;

    let locked = sqlx::query_as::<_, (i64, i64)>(LOCK_REVERSAL_BATCH)
        .bind(batch.to_vec())
        .bind(now)
        .bind(since)
        .bind(AuctionStatus::Bidding)
        .fetch_all(&mut *tx)
        .await?;

    if locked.is_empty() {
        tx.rollback().await?;
        return Ok(0);
    }

    let (auction_ids, leaders): (Vec<i64>, Vec<i64>) = locked.into_iter().unzip();

    let reverted = sqlx::query(REVERT_AUCTIONS)
        .bind(&auction_ids)
        .bind(AuctionStatus::Open)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query(VOID_DEFAULTED_BIDS)
        .bind(&auction_ids)
        .bind(&leaders)
        .bind(BidStatus::Void)
        .bind(now)
        .bind(BidStatus::Active)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(reverted as usize)
}
// endregion: --- Auction Scheduler
