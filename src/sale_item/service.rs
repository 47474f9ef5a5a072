// region:    --- Imports
use super::model::{NewSaleItem, SaleItem, SaleItemWithItem, SalesType};
use crate::catalog::{CatalogFilter, CatalogPage, CatalogPlanner};
use crate::database::DatabaseManager;
use crate::error::{MarketError, Result};
use crate::registry::ItemKindRegistry;
use sqlx::PgConnection;
use std::sync::Arc;
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Queries
const GET_SALES_TYPE: &str = "SELECT * FROM sales_types WHERE id = $1";

const GET_ACTIVE_SALES_TYPES: &str =
    "SELECT * FROM sales_types WHERE status = 1 ORDER BY sort_key ASC, id ASC";

const GET_SALE_ITEM: &str = "SELECT * FROM sale_items WHERE id = $1";

const INSERT_SALE_ITEM: &str = r#"
    INSERT INTO sale_items (owner_id, sales_type, item_id)
    VALUES ($1, $2, $3)
    RETURNING *
"#;
// endregion: --- Queries

// region:    --- Sale Item Service
/// 판매 상품 서비스
pub struct SaleItemService {
    db_manager: Arc<DatabaseManager>,
    registry: Arc<ItemKindRegistry>,
    planner: CatalogPlanner,
}

impl SaleItemService {
    pub fn new(db_manager: Arc<DatabaseManager>, registry: Arc<ItemKindRegistry>) -> Self {
        let planner = CatalogPlanner::new(Arc::clone(&db_manager));
        Self {
            db_manager,
            registry,
            planner,
        }
    }

    /// 판매 상품 생성
    /// 실제 상품 생성과 판매 상품 저장은 하나의 트랜잭션으로 묶는다.
    pub async fn create(&self, new_item: NewSaleItem) -> Result<SaleItemWithItem> {
        info!(
            "{:<12} --> 판매 상품 생성: owner={}, sales_type={}, item_id={:?}",
            "SaleItem", new_item.owner_id, new_item.sales_type, new_item.item_id
        );
        let mut tx = self.db_manager.pool().begin().await?;

        let sales_type = fetch_sales_type(&mut tx, new_item.sales_type).await?;
        let service = self.registry.get(&sales_type.service_name)?;

        let (item_id, item) = match new_item.item_id {
            Some(item_id) => (item_id, service.find_by_id(&mut tx, item_id).await?),
            None => {
                let record = service.create(&mut tx, new_item.item).await?;
                (record.id(), Some(record))
            }
        };

        let sale_item = sqlx::query_as::<_, SaleItem>(INSERT_SALE_ITEM)
            .bind(new_item.owner_id)
            .bind(sales_type.id)
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            "{:<12} --> 판매 상품 생성 완료: id={}, {}={}",
            "SaleItem", sale_item.id, sales_type.service_name, item_id
        );

        Ok(SaleItemWithItem {
            sale_item,
            sales_type,
            item,
        })
    }

    /// 판매 상품과 실제 상품 조회
    /// 실제 상품이 없으면 `item` 이 비어 있는 채로 돌려준다.
    pub async fn fetch_with_item(&self, sale_item_id: i64) -> Result<SaleItemWithItem> {
        info!("{:<12} --> 판매 상품 조회 id: {}", "SaleItem", sale_item_id);
        let mut conn = self.db_manager.pool().acquire().await?;

        let sale_item = sqlx::query_as::<_, SaleItem>(GET_SALE_ITEM)
            .bind(sale_item_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(MarketError::NotFound {
                entity: "sale_item",
                id: sale_item_id,
            })?;

        let sales_type = fetch_sales_type(&mut conn, sale_item.sales_type).await?;
        let service = self.registry.get(&sales_type.service_name)?;
        let item = service.find_by_id(&mut conn, sale_item.item_id).await?;
        if item.is_none() {
            warn!(
                "{:<12} --> 실제 상품이 없습니다: sale_item={}, {}={}",
                "SaleItem", sale_item.id, sales_type.service_name, sale_item.item_id
            );
        }

        Ok(SaleItemWithItem {
            sale_item,
            sales_type,
            item,
        })
    }

    /// 판매 상품 목록 검색
    pub async fn search(&self, filter: &CatalogFilter) -> Result<CatalogPage> {
        self.planner.search(filter).await
    }

    /// 판매 유형 조회
    pub async fn find_sales_type(&self, sales_type_id: i64) -> Result<SalesType> {
        let mut conn = self.db_manager.pool().acquire().await?;
        fetch_sales_type(&mut conn, sales_type_id).await
    }

    /// 사용 중인 판매 유형 목록
    pub async fn list_sales_types(&self) -> Result<Vec<SalesType>> {
        let sales_types = sqlx::query_as::<_, SalesType>(GET_ACTIVE_SALES_TYPES)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(sales_types)
    }

    /// 사용 중인 판매 유형이 모두 레지스트리에 등록되어 있는지 확인
    pub async fn verify_sales_types(&self) -> Result<()> {
        for sales_type in self.list_sales_types().await? {
            if !self.registry.contains(&sales_type.service_name) {
                warn!(
                    "{:<12} --> 등록되지 않은 판매 유형 서비스: {} ({})",
                    "SaleItem", sales_type.service_name, sales_type.code
                );
                return Err(MarketError::UnknownKind(sales_type.service_name));
            }
        }
        Ok(())
    }
}

async fn fetch_sales_type(conn: &mut PgConnection, sales_type_id: i64) -> Result<SalesType> {
    sqlx::query_as::<_, SalesType>(GET_SALES_TYPE)
        .bind(sales_type_id)
        .fetch_optional(conn)
        .await?
        .ok_or(MarketError::NotFound {
            entity: "sales_type",
            id: sales_type_id,
        })
}
// endregion: --- Sale Item Service
