use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 진행 상태 (auction_items.status)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum AuctionStatus {
    Open = 1,
    Bidding = 2,
    Confirmed = 3,
    Closed = 4,
}

impl AuctionStatus {
    pub fn code(self) -> i16 {
        self as i16
    }
}

// 입찰 기록 상태 (auction_item_histories.status)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum BidStatus {
    Active = 1,
    Void = 2,
}

// 경매 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuctionItem {
    pub id: i64,
    pub auction_code: String,
    pub name: String,
    pub description: String,
    pub company_id: Option<i64>,
    pub department_id: i64,
    pub device_type_id: i64,
    pub manufacturer_id: Option<i64>,
    pub status: AuctionStatus,
    pub accept_id: Option<i64>,
    pub seller_steps: i16,
    pub buyer_steps: i16,
    pub seller_timeout: Option<DateTime<Utc>>,
    pub buyer_timeout: Option<DateTime<Utc>>,
    pub start_timestamp: Option<DateTime<Utc>>,
    pub auction_timeout: Option<DateTime<Utc>>,
    pub expired_count: Option<i16>,
    pub visit_date: Option<NaiveDate>,
    pub visit_time: Option<NaiveTime>,
    pub quantity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 저장된 컬럼에서 읽어낸 경매 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionPhase {
    Open {
        expired_count: i16,
    },
    Bidding {
        leader: i64,
        expired_count: i16,
    },
    AwaitingSettlement {
        leader: i64,
        seller_steps: i16,
        buyer_steps: i16,
    },
    Confirmed,
    Closed,
}

impl AuctionPhase {
    /// 입찰 가능 여부
    pub fn accepts_bids(&self) -> bool {
        matches!(self, AuctionPhase::Open { .. } | AuctionPhase::Bidding { .. })
    }

    pub fn leader(&self) -> Option<i64> {
        match self {
            AuctionPhase::Bidding { leader, .. }
            | AuctionPhase::AwaitingSettlement { leader, .. } => Some(*leader),
            _ => None,
        }
    }
}

impl AuctionItem {
    pub fn phase(&self) -> AuctionPhase {
        let expired_count = self.expired_count.unwrap_or(0);
        match (self.status, self.accept_id) {
            (AuctionStatus::Closed, _) => AuctionPhase::Closed,
            (AuctionStatus::Confirmed, _) => AuctionPhase::Confirmed,
            (AuctionStatus::Bidding, Some(leader)) if self.seller_steps >= 2 => {
                AuctionPhase::AwaitingSettlement {
                    leader,
                    seller_steps: self.seller_steps,
                    buyer_steps: self.buyer_steps,
                }
            }
            (AuctionStatus::Bidding, Some(leader)) => AuctionPhase::Bidding {
                leader,
                expired_count,
            },
            (AuctionStatus::Open, _) | (AuctionStatus::Bidding, None) => {
                AuctionPhase::Open { expired_count }
            }
        }
    }
}

// 입찰 기록 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuctionItemHistory {
    pub id: i64,
    pub auction_item_id: i64,
    pub user_id: i64,
    pub value: i64,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 알림 전달용 입찰자 프로필
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidderProfile {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// 입찰 처리 결과
#[derive(Debug, Clone, Serialize)]
pub struct BidPlacement {
    pub bid: AuctionItemHistory,
    pub auction: AuctionItem,
    pub bidder: Option<BidderProfile>,
}

/// 경매 상품 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuctionItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_id: Option<i64>,
    pub department_id: i64,
    pub device_type_id: i64,
    #[serde(default)]
    pub manufacturer_id: Option<i64>,
    #[serde(default)]
    pub start_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auction_timeout: Option<DateTime<Utc>>,
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    #[serde(default)]
    pub visit_time: Option<NaiveTime>,
    #[serde(default)]
    pub quantity: Option<i32>,
}

/// 경매 코드 접두어: 진료과 코드 + 장비 종류 코드 + YYMMDD
pub fn auction_code_prefix(department_code: &str, device_type_code: &str, date: NaiveDate) -> String {
    format!(
        "{}{}{}",
        department_code.trim().to_uppercase(),
        device_type_code.trim().to_uppercase(),
        date.format("%y%m%d")
    )
}

/// 접두어 + 일별 순번(3자리)
pub fn format_auction_code(prefix: &str, sequence: i64) -> String {
    format!("{prefix}{sequence:03}")
}
