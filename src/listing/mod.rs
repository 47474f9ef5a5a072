/// 정가 판매 상품
/// 경매와 같은 참조 데이터(회사/진료과/장비 종류/제조사)를 가진다.
// region:    --- Imports
use crate::catalog::{CatalogFilter, CatalogPage, CatalogPlanner};
use crate::database::DatabaseManager;
use crate::error::{MarketError, Result};
use crate::registry::{ItemKindService, ItemRecord, LISTING_KIND};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

// region:    --- Model
// 정가 판매 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ListingItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub quantity: Option<i32>,
    pub company_id: Option<i64>,
    pub department_id: Option<i64>,
    pub device_type_id: Option<i64>,
    pub manufacturer_id: Option<i64>,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 정가 판매 상품 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListingItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub device_type_id: Option<i64>,
    #[serde(default)]
    pub manufacturer_id: Option<i64>,
}
// endregion: --- Model

// region:    --- Queries
const GET_LISTING: &str = "SELECT * FROM listing_items WHERE id = $1";

const INSERT_LISTING: &str = r#"
    INSERT INTO listing_items (
        name, description, price, quantity, company_id, department_id,
        device_type_id, manufacturer_id
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    RETURNING *
"#;
// endregion: --- Queries

// region:    --- Listing Service
pub struct ListingService {
    db_manager: Arc<DatabaseManager>,
    planner: CatalogPlanner,
}

impl ListingService {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        let planner = CatalogPlanner::new(Arc::clone(&db_manager));
        Self {
            db_manager,
            planner,
        }
    }

    /// 정가 판매 상품 생성
    pub async fn create(&self, new_item: NewListingItem) -> Result<ListingItem> {
        let mut conn = self.db_manager.pool().acquire().await?;
        insert_listing(&mut conn, &new_item).await
    }

    /// 정가 판매 상품 조회
    pub async fn find_by_id(&self, listing_id: i64) -> Result<ListingItem> {
        info!("{:<12} --> 정가 상품 조회 id: {}", "Listing", listing_id);
        sqlx::query_as::<_, ListingItem>(GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?
            .ok_or(MarketError::NotFound {
                entity: "listing_item",
                id: listing_id,
            })
    }

    /// 정가 판매 상품 목록 검색
    pub async fn search(&self, filter: CatalogFilter) -> Result<CatalogPage> {
        self.planner
            .search(&filter.restricted_to(&[LISTING_KIND]))
            .await
    }
}

async fn insert_listing(conn: &mut PgConnection, new_item: &NewListingItem) -> Result<ListingItem> {
    info!("{:<12} --> 정가 상품 생성: {}", "Listing", new_item.name);

    let item = sqlx::query_as::<_, ListingItem>(INSERT_LISTING)
        .bind(&new_item.name)
        .bind(&new_item.description)
        .bind(new_item.price)
        .bind(new_item.quantity)
        .bind(new_item.company_id)
        .bind(new_item.department_id)
        .bind(new_item.device_type_id)
        .bind(new_item.manufacturer_id)
        .fetch_one(conn)
        .await?;
    Ok(item)
}

#[async_trait]
impl ItemKindService for ListingService {
    fn kind(&self) -> &'static str {
        LISTING_KIND
    }

    async fn create(
        &self,
        conn: &mut PgConnection,
        payload: serde_json::Value,
    ) -> Result<ItemRecord> {
        let new_item: NewListingItem = serde_json::from_value(payload)?;
        let item = insert_listing(conn, &new_item).await?;
        Ok(ItemRecord::Listing(item))
    }

    async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<ItemRecord>> {
        let item = sqlx::query_as::<_, ListingItem>(GET_LISTING)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(item.map(ItemRecord::Listing))
    }
}
// endregion: --- Listing Service
