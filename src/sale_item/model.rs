use crate::registry::ItemRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 판매 유형 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalesType {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// 상품 종류 레지스트리 키
    pub service_name: String,
    /// 실제 상품 테이블
    pub model: String,
    pub sort_key: i32,
    pub status: i16,
}

// 판매 상품 모델. `item_id` 는 `sales_type` 과 함께일 때만 의미가 있다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SaleItem {
    pub id: i64,
    pub owner_id: i64,
    pub sales_type: i64,
    pub item_id: i64,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 판매 상품 생성 요청
/// `item_id` 가 없으면 `item` 으로 실제 상품을 먼저 만든다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub owner_id: i64,
    pub sales_type: i64,
    #[serde(default)]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub item: serde_json::Value,
}

/// 실제 상품이 붙은 판매 상품 (상품은 메모리에서만 붙인다)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemWithItem {
    pub sale_item: SaleItem,
    pub sales_type: SalesType,
    pub item: Option<ItemRecord>,
}
