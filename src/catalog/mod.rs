/// 판매 상품 통합 목록 조회
/// 한 번의 조인 쿼리로 경매/정가 상품을 함께 조회하고, 같은 조건의 건수 쿼리로 페이지 수를 계산한다.
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Modules
pub mod filter;
pub mod planner;
pub mod row;

pub use filter::{CatalogFilter, Pagination, RangeOp, StatusRange};
pub use planner::{plan_count, plan_page, BindValue, CatalogQuery};
pub use row::{
    AuctionVariant, CatalogEntry, CatalogPage, CatalogRow, CatalogVariant, ListingVariant,
    ReferenceData,
};
// endregion: --- Modules

// region:    --- Catalog Planner
pub struct CatalogPlanner {
    db_manager: Arc<DatabaseManager>,
}

impl CatalogPlanner {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }

    /// 판매 상품 목록 조회
    pub async fn search(&self, filter: &CatalogFilter) -> Result<CatalogPage> {
        info!("{:<12} --> 판매 상품 목록 조회: {:?}", "Catalog", filter);
        let pagination = filter.pagination();

        let page_query = plan_page(filter);
        let rows = page_query
            .bind_to(sqlx::query_as::<_, CatalogRow>(&page_query.sql))
            .fetch_all(self.db_manager.pool())
            .await?;

        let count_query = plan_count(filter);
        let (total,) = count_query
            .bind_to(sqlx::query_as::<_, (i64,)>(&count_query.sql))
            .fetch_one(self.db_manager.pool())
            .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let sale_item_id = row.sale_item_id;
            let service_name = row.service_name.clone();
            match row.into_entry() {
                Some(entry) => entries.push(entry),
                None => warn!(
                    "{:<12} --> 상품 정보를 만들 수 없는 행: sale_item={}, service={}",
                    "Catalog", sale_item_id, service_name
                ),
            }
        }

        Ok(CatalogPage {
            entries,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
            total_pages: pagination.total_pages(total),
        })
    }
}
// endregion: --- Catalog Planner
