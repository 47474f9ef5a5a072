// region:    --- Imports
use super::commands::{self, PlaceBidCommand};
use super::model::{
    auction_code_prefix, format_auction_code, AuctionItem, AuctionItemHistory, AuctionStatus,
    BidPlacement, BidStatus, NewAuctionItem,
};
use super::queries;
use crate::catalog::{CatalogFilter, CatalogPage, CatalogPlanner};
use crate::database::DatabaseManager;
use crate::error::{MarketError, Result};
use crate::registry::{ItemKindService, ItemRecord, AUCTION_KIND};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgConnection;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

// region:    --- Auction Service
/// 경매 상품 서비스
pub struct AuctionService {
    db_manager: Arc<DatabaseManager>,
    planner: CatalogPlanner,
}

impl AuctionService {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        let planner = CatalogPlanner::new(Arc::clone(&db_manager));
        Self {
            db_manager,
            planner,
        }
    }

    /// 경매 상품 생성
    pub async fn create(&self, new_item: NewAuctionItem) -> Result<AuctionItem> {
        let mut tx = self.db_manager.pool().begin().await?;
        let item = create_auction(&mut tx, new_item).await?;
        tx.commit().await?;
        Ok(item)
    }

    /// 경매 상품 조회
    pub async fn find_by_id(&self, auction_id: i64) -> Result<AuctionItem> {
        info!("{:<12} --> 경매 조회 id: {}", "Auction", auction_id);
        sqlx::query_as::<_, AuctionItem>(queries::GET_AUCTION)
            .bind(auction_id)
            .fetch_optional(self.db_manager.pool())
            .await?
            .ok_or(MarketError::NotFound {
                entity: "auction_item",
                id: auction_id,
            })
    }

    /// 경매 코드로 조회
    pub async fn find_by_code(&self, auction_code: &str) -> Result<AuctionItem> {
        info!("{:<12} --> 경매 코드 조회: {}", "Auction", auction_code);
        sqlx::query_as::<_, AuctionItem>(queries::GET_AUCTION_BY_CODE)
            .bind(auction_code)
            .fetch_optional(self.db_manager.pool())
            .await?
            .ok_or_else(|| MarketError::NotFoundByCode {
                entity: "auction_item",
                code: auction_code.to_string(),
            })
    }

    /// 경매 상품 목록 검색
    pub async fn search(&self, filter: CatalogFilter) -> Result<CatalogPage> {
        self.planner
            .search(&filter.restricted_to(&[AUCTION_KIND]))
            .await
    }

    /// 입찰
    pub async fn place_bid(&self, owner_id: i64, auction_id: i64, value: i64) -> Result<BidPlacement> {
        let cmd = PlaceBidCommand {
            auction_id,
            bidder_id: owner_id,
            value,
        };
        commands::handle_place_bid(cmd, &self.db_manager).await
    }

    /// 보증금 확인
    pub async fn confirm_deposit(&self, auction_id: i64) -> Result<AuctionItem> {
        commands::handle_confirm_deposit(auction_id, &self.db_manager).await
    }

    /// 판매자 낙찰 승인
    pub async fn accept_leading_bid(&self, auction_id: i64) -> Result<AuctionItem> {
        commands::handle_accept_leading_bid(auction_id, &self.db_manager).await
    }

    /// 구매자 낙찰 확인
    pub async fn acknowledge_award(&self, auction_id: i64, user_id: i64) -> Result<AuctionItem> {
        commands::handle_acknowledge_award(auction_id, user_id, &self.db_manager).await
    }

    /// 입찰 이력 조회 (최신순)
    pub async fn bid_history(&self, auction_id: i64) -> Result<Vec<AuctionItemHistory>> {
        info!("{:<12} --> 입찰 이력 조회 id: {}", "Auction", auction_id);
        let history = sqlx::query_as::<_, AuctionItemHistory>(queries::GET_BID_HISTORY)
            .bind(auction_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(history)
    }

    /// 현재 최고 입찰 조회
    pub async fn leading_bid(&self, auction_id: i64) -> Result<Option<AuctionItemHistory>> {
        let bid = sqlx::query_as::<_, AuctionItemHistory>(queries::GET_LEADING_BID)
            .bind(auction_id)
            .bind(BidStatus::Active)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(bid)
    }
}

/// 경매 코드 생성 후 경매 상품 저장
/// 호출자가 연 트랜잭션 안에서 실행되어야 코드 접두어 잠금이 유지된다.
async fn create_auction(conn: &mut PgConnection, new_item: NewAuctionItem) -> Result<AuctionItem> {
    info!("{:<12} --> 경매 상품 생성: {}", "Auction", new_item.name);

    let department_code = sqlx::query_scalar::<_, String>(queries::GET_DEPARTMENT_CODE)
        .bind(new_item.department_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(MarketError::NotFound {
            entity: "department",
            id: new_item.department_id,
        })?;
    let device_type_code = sqlx::query_scalar::<_, String>(queries::GET_DEVICE_TYPE_CODE)
        .bind(new_item.device_type_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(MarketError::NotFound {
            entity: "device_type",
            id: new_item.device_type_id,
        })?;

    let prefix = auction_code_prefix(&department_code, &device_type_code, Utc::now().date_naive());
    sqlx::query(queries::LOCK_CODE_PREFIX)
        .bind(&prefix)
        .execute(&mut *conn)
        .await?;
    let existing = sqlx::query_scalar::<_, i64>(queries::COUNT_CODES_WITH_PREFIX)
        .bind(&prefix)
        .fetch_one(&mut *conn)
        .await?;
    let auction_code = format_auction_code(&prefix, existing + 1);

    let item = sqlx::query_as::<_, AuctionItem>(queries::INSERT_AUCTION)
        .bind(&auction_code)
        .bind(&new_item.name)
        .bind(&new_item.description)
        .bind(new_item.company_id)
        .bind(new_item.department_id)
        .bind(new_item.device_type_id)
        .bind(new_item.manufacturer_id)
        .bind(AuctionStatus::Open)
        .bind(new_item.start_timestamp)
        .bind(new_item.auction_timeout)
        .bind(new_item.visit_date)
        .bind(new_item.visit_time)
        .bind(new_item.quantity)
        .fetch_one(&mut *conn)
        .await?;

    info!(
        "{:<12} --> 경매 상품 생성 완료: id={}, code={}",
        "Auction", item.id, item.auction_code
    );
    Ok(item)
}

#[async_trait]
impl ItemKindService for AuctionService {
    fn kind(&self) -> &'static str {
        AUCTION_KIND
    }

    async fn create(
        &self,
        conn: &mut PgConnection,
        payload: serde_json::Value,
    ) -> Result<ItemRecord> {
        let new_item: NewAuctionItem = serde_json::from_value(payload)?;
        let item = create_auction(conn, new_item).await?;
        Ok(ItemRecord::Auction(item))
    }

    async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<ItemRecord>> {
        let item = sqlx::query_as::<_, AuctionItem>(queries::GET_AUCTION)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(item.map(ItemRecord::Auction))
    }
}
// endregion: --- Auction Service
