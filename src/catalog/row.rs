use crate::auction::model::AuctionStatus;
use crate::registry::{AUCTION_KIND, LISTING_KIND};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 통합 조회 결과 한 행. 경매/정가 컬럼 그룹 중 한쪽만 채워진다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogRow {
    pub sale_item_id: i64,
    pub owner_id: i64,
    pub item_id: i64,
    pub sale_status: i16,
    pub updated_at: DateTime<Utc>,
    pub sales_type_id: i64,
    pub sales_type_code: String,
    pub service_name: String,

    pub auction_id: Option<i64>,
    pub auction_code: Option<String>,
    pub auction_name: Option<String>,
    pub auction_description: Option<String>,
    pub auction_status: Option<AuctionStatus>,
    pub accept_id: Option<i64>,
    pub start_timestamp: Option<DateTime<Utc>>,
    pub auction_timeout: Option<DateTime<Utc>>,
    pub expired_count: Option<i16>,
    pub auction_quantity: Option<i32>,

    pub listing_id: Option<i64>,
    pub listing_name: Option<String>,
    pub listing_description: Option<String>,
    pub price: Option<i64>,
    pub listing_quantity: Option<i32>,
    pub listing_status: Option<i16>,

    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub company_area: Option<String>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub device_type_id: Option<i64>,
    pub device_type_name: Option<String>,
    pub manufacturer_id: Option<i64>,
    pub manufacturer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionVariant {
    pub id: i64,
    pub auction_code: String,
    pub name: String,
    pub description: String,
    pub status: AuctionStatus,
    pub accept_id: Option<i64>,
    pub start_timestamp: Option<DateTime<Utc>>,
    pub auction_timeout: Option<DateTime<Utc>>,
    pub expired_count: Option<i16>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingVariant {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub quantity: Option<i32>,
    pub status: i16,
}

/// 판매 유형별 상품 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogVariant {
    Auction(AuctionVariant),
    Listing(ListingVariant),
}

/// 공통 참조 데이터
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub company_area: Option<String>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub device_type_id: Option<i64>,
    pub device_type_name: Option<String>,
    pub manufacturer_id: Option<i64>,
    pub manufacturer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub sale_item_id: i64,
    pub owner_id: i64,
    pub item_id: i64,
    pub sale_status: i16,
    pub sales_type_id: i64,
    pub sales_type_code: String,
    pub updated_at: DateTime<Utc>,
    pub reference: ReferenceData,
    pub item: CatalogVariant,
}

impl CatalogRow {
    /// `service_name` 에 맞는 컬럼 그룹으로 결과를 만든다.
    /// 해당 그룹이 비어 있으면 `None`.
    pub fn into_entry(self) -> Option<CatalogEntry> {
        let item = match self.service_name.as_str() {
            AUCTION_KIND => {
                let id = self.auction_id?;
                CatalogVariant::Auction(AuctionVariant {
                    id,
                    auction_code: self.auction_code.unwrap_or_default(),
                    name: self.auction_name.unwrap_or_default(),
                    description: self.auction_description.unwrap_or_default(),
                    status: self.auction_status?,
                    accept_id: self.accept_id,
                    start_timestamp: self.start_timestamp,
                    auction_timeout: self.auction_timeout,
                    expired_count: self.expired_count,
                    quantity: self.auction_quantity,
                })
            }
            LISTING_KIND => {
                let id = self.listing_id?;
                CatalogVariant::Listing(ListingVariant {
                    id,
                    name: self.listing_name.unwrap_or_default(),
                    description: self.listing_description.unwrap_or_default(),
                    price: self.price.unwrap_or_default(),
                    quantity: self.listing_quantity,
                    status: self.listing_status.unwrap_or_default(),
                })
            }
            _ => return None,
        };

        Some(CatalogEntry {
            sale_item_id: self.sale_item_id,
            owner_id: self.owner_id,
            item_id: self.item_id,
            sale_status: self.sale_status,
            sales_type_id: self.sales_type_id,
            sales_type_code: self.sales_type_code,
            updated_at: self.updated_at,
            reference: ReferenceData {
                company_id: self.company_id,
                company_name: self.company_name,
                company_area: self.company_area,
                department_id: self.department_id,
                department_name: self.department_name,
                device_type_id: self.device_type_id,
                device_type_name: self.device_type_name,
                manufacturer_id: self.manufacturer_id,
                manufacturer_name: self.manufacturer_name,
            },
            item,
        })
    }
}

/// 페이지 조회 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_row(service_name: &str) -> CatalogRow {
        CatalogRow {
            sale_item_id: 10,
            owner_id: 7,
            item_id: 3,
            sale_status: 1,
            updated_at: Utc::now(),
            sales_type_id: 1,
            sales_type_code: service_name.to_uppercase(),
            service_name: service_name.to_string(),
            auction_id: None,
            auction_code: None,
            auction_name: None,
            auction_description: None,
            auction_status: None,
            accept_id: None,
            start_timestamp: None,
            auction_timeout: None,
            expired_count: None,
            auction_quantity: None,
            listing_id: None,
            listing_name: None,
            listing_description: None,
            price: None,
            listing_quantity: None,
            listing_status: None,
            company_id: None,
            company_name: None,
            company_area: None,
            department_id: Some(1),
            department_name: Some("Radiology".to_string()),
            device_type_id: None,
            device_type_name: None,
            manufacturer_id: None,
            manufacturer_name: None,
        }
    }

    #[test]
    fn auction_rows_become_auction_variants() {
        let mut row = base_row(AUCTION_KIND);
        row.auction_id = Some(3);
        row.auction_code = Some("RDXR261018001".to_string());
        row.auction_name = Some("CT scanner".to_string());
        row.auction_status = Some(AuctionStatus::Bidding);
        row.accept_id = Some(77);

        let entry = row.into_entry().unwrap();
        match entry.item {
            CatalogVariant::Auction(auction) => {
                assert_eq!(auction.id, 3);
                assert_eq!(auction.auction_code, "RDXR261018001");
                assert_eq!(auction.status, AuctionStatus::Bidding);
                assert_eq!(auction.accept_id, Some(77));
            }
            other => panic!("expected auction variant, got {other:?}"),
        }
        assert_eq!(entry.reference.department_name.as_deref(), Some("Radiology"));
    }

    #[test]
    fn listing_rows_become_listing_variants() {
        let mut row = base_row(LISTING_KIND);
        row.listing_id = Some(3);
        row.listing_name = Some("Stethoscope".to_string());
        row.price = Some(120_000);
        row.listing_status = Some(1);

        let entry = row.into_entry().unwrap();
        assert_eq!(
            entry.item,
            CatalogVariant::Listing(ListingVariant {
                id: 3,
                name: "Stethoscope".to_string(),
                description: String::new(),
                price: 120_000,
                quantity: None,
                status: 1,
            })
        );
    }

    #[test]
    fn the_other_shape_is_never_used() {
        let mut row = base_row(LISTING_KIND);
        row.auction_id = Some(3);
        row.auction_status = Some(AuctionStatus::Open);
        assert!(row.into_entry().is_none());
    }

    #[test]
    fn unknown_service_names_produce_nothing() {
        let mut row = base_row("barter");
        row.listing_id = Some(3);
        assert!(row.into_entry().is_none());
    }

    #[test]
    fn variants_serialize_with_kind_tag() {
        let variant = CatalogVariant::Listing(ListingVariant {
            id: 1,
            name: "Monitor".to_string(),
            description: String::new(),
            price: 10,
            quantity: Some(2),
            status: 1,
        });
        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["kind"], "listing");
        assert_eq!(json["price"], 10);
    }
}
