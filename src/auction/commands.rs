/// 경매 관련 커맨드 처리
/// 1. 입찰
/// 2. 보증금 확인
/// 3. 판매자 낙찰 승인
/// 4. 구매자 낙찰 확인
/// 모든 커맨드는 경매 행을 `FOR UPDATE` 로 잠근 하나의 트랜잭션 안에서 실행된다.
// region:    --- Imports
use super::model::{
    AuctionItem, AuctionItemHistory, AuctionPhase, AuctionStatus, BidPlacement, BidStatus,
    BidderProfile,
};
use super::queries;
use crate::database::DatabaseManager;
use crate::error::{MarketError, Result};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 후 판매자/구매자 단계 타임아웃 (분)
pub const BID_STEP_TIMEOUT_MINUTES: i64 = 5;

/// 판매자 승인 후 구매자 보증금 납부 기한 (시간)
pub const DEPOSIT_WINDOW_HOURS: i64 = 24;

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub auction_id: i64,
    pub bidder_id: i64,
    pub value: i64,
}

/// 경매 행을 잠그고 조회
async fn lock_auction(conn: &mut PgConnection, auction_id: i64) -> Result<AuctionItem> {
    sqlx::query_as::<_, AuctionItem>(queries::GET_AUCTION_FOR_UPDATE)
        .bind(auction_id)
        .fetch_optional(conn)
        .await?
        .ok_or(MarketError::NotFound {
            entity: "auction_item",
            id: auction_id,
        })
}

fn invalid_state(auction_id: i64, phase: AuctionPhase) -> MarketError {
    MarketError::InvalidState {
        auction_id,
        reason: format!("{phase:?}"),
    }
}

/// 1. 입찰
/// 현재 유효한 최고 입찰가보다 높아야 하며, 입찰자가 새 최고 입찰자가 된다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    db_manager: &DatabaseManager,
) -> Result<BidPlacement> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    db_manager
        .transaction(move |tx| {
            Box::pin(async move {
                let auction = lock_auction(&mut **tx, cmd.auction_id).await?;

                let phase = auction.phase();
                if !phase.accepts_bids() {
                    warn!(
                        "{:<12} --> 입찰 불가 상태: id={}, phase={:?}",
                        "Command", auction.id, phase
                    );
                    return Err(invalid_state(auction.id, phase));
                }

                let leading = sqlx::query_as::<_, AuctionItemHistory>(queries::GET_LEADING_BID)
                    .bind(auction.id)
                    .bind(BidStatus::Active)
                    .fetch_optional(&mut **tx)
                    .await?;

                let leading_value = leading.as_ref().map(|bid| bid.value).unwrap_or(0);
                if cmd.value <= leading_value {
                    warn!(
                        "{:<12} --> 입찰 금액이 최고 입찰가보다 낮습니다: {} <= {}",
                        "Command", cmd.value, leading_value
                    );
                    return Err(MarketError::BidTooLow {
                        value: cmd.value,
                        leading: leading_value,
                    });
                }

                let now = Utc::now();
                let bid = sqlx::query_as::<_, AuctionItemHistory>(queries::INSERT_BID)
                    .bind(auction.id)
                    .bind(cmd.bidder_id)
                    .bind(cmd.value)
                    .bind(BidStatus::Active)
                    .bind(now)
                    .fetch_one(&mut **tx)
                    .await?;

                let timeout = now + Duration::minutes(BID_STEP_TIMEOUT_MINUTES);
                let auction = sqlx::query_as::<_, AuctionItem>(queries::APPLY_BID)
                    .bind(auction.id)
                    .bind(AuctionStatus::Bidding)
                    .bind(cmd.bidder_id)
                    .bind(timeout)
                    .bind(now)
                    .fetch_one(&mut **tx)
                    .await?;

                let bidder = sqlx::query_as::<_, BidderProfile>(queries::GET_BIDDER_PROFILE)
                    .bind(cmd.bidder_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                info!(
                    "{:<12} --> 입찰 성공: id={}, 최고 입찰가 {}",
                    "Command", auction.id, bid.value
                );
                Ok(BidPlacement {
                    bid,
                    auction,
                    bidder,
                })
            })
        })
        .await
}

/// 2. 보증금 확인
/// 이미 확인된 경매는 그대로 돌려준다.
pub async fn handle_confirm_deposit(
    auction_id: i64,
    db_manager: &DatabaseManager,
) -> Result<AuctionItem> {
    info!("{:<12} --> 보증금 확인 처리 시작: id={}", "Command", auction_id);

    db_manager
        .transaction(move |tx| {
            Box::pin(async move {
                let auction = lock_auction(&mut **tx, auction_id).await?;
                let phase = auction.phase();

                match phase {
                    AuctionPhase::Confirmed => {
                        info!("{:<12} --> 이미 확인된 경매: id={}", "Command", auction_id);
                        Ok(auction)
                    }
                    AuctionPhase::Bidding { .. } | AuctionPhase::AwaitingSettlement { .. } => {
                        let auction = sqlx::query_as::<_, AuctionItem>(queries::CONFIRM_DEPOSIT)
                            .bind(auction_id)
                            .bind(AuctionStatus::Confirmed)
                            .bind(Utc::now())
                            .fetch_one(&mut **tx)
                            .await?;
                        info!("{:<12} --> 보증금 확인 완료: id={}", "Command", auction_id);
                        Ok(auction)
                    }
                    AuctionPhase::Open { .. } | AuctionPhase::Closed => {
                        warn!(
                            "{:<12} --> 최고 입찰자가 없는 경매: id={}, phase={:?}",
                            "Command", auction_id, phase
                        );
                        Err(invalid_state(auction_id, phase))
                    }
                }
            })
        })
        .await
}

/// 3. 판매자 낙찰 승인
/// 승인 이후 신규 입찰은 막히고, 구매자는 `DEPOSIT_WINDOW_HOURS` 안에 보증금을 납부해야 한다.
pub async fn handle_accept_leading_bid(
    auction_id: i64,
    db_manager: &DatabaseManager,
) -> Result<AuctionItem> {
    info!("{:<12} --> 판매자 낙찰 승인: id={}", "Command", auction_id);

    db_manager
        .transaction(move |tx| {
            Box::pin(async move {
                let auction = lock_auction(&mut **tx, auction_id).await?;
                match auction.phase() {
                    AuctionPhase::AwaitingSettlement { .. } => Ok(auction),
                    AuctionPhase::Bidding { .. } => {
                        let now = Utc::now();
                        let auction =
                            sqlx::query_as::<_, AuctionItem>(queries::ACCEPT_LEADING_BID)
                                .bind(auction_id)
                                .bind(now + Duration::hours(DEPOSIT_WINDOW_HOURS))
                                .bind(now)
                                .fetch_one(&mut **tx)
                                .await?;
                        Ok(auction)
                    }
                    phase => Err(invalid_state(auction_id, phase)),
                }
            })
        })
        .await
}

/// 4. 구매자 낙찰 확인
/// 최고 입찰자 본인만 확인할 수 있다.
pub async fn handle_acknowledge_award(
    auction_id: i64,
    user_id: i64,
    db_manager: &DatabaseManager,
) -> Result<AuctionItem> {
    info!(
        "{:<12} --> 구매자 낙찰 확인: id={}, user={}",
        "Command", auction_id, user_id
    );

    db_manager
        .transaction(move |tx| {
            Box::pin(async move {
                let auction = lock_auction(&mut **tx, auction_id).await?;
                match auction.phase() {
                    AuctionPhase::AwaitingSettlement {
                        leader,
                        buyer_steps,
                        ..
                    } if leader == user_id => {
                        if buyer_steps >= 2 {
                            return Ok(auction);
                        }
                        let auction = sqlx::query_as::<_, AuctionItem>(queries::ACKNOWLEDGE_AWARD)
                            .bind(auction_id)
                            .bind(Utc::now())
                            .fetch_one(&mut **tx)
                            .await?;
                        Ok(auction)
                    }
                    phase => {
                        warn!(
                            "{:<12} --> 낙찰 확인 불가: id={}, user={}, phase={:?}",
                            "Command", auction_id, user_id, phase
                        );
                        Err(invalid_state(auction_id, phase))
                    }
                }
            })
        })
        .await
}

// endregion: --- Commands
