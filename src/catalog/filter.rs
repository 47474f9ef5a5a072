use crate::auction::model::AuctionStatus;
use crate::registry::AUCTION_KIND;
use serde::{Deserialize, Serialize};

/// 기본 페이지 크기
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// 최대 페이지 크기
pub const MAX_PAGE_SIZE: i64 = 100;

/// 경매 상태 비교 연산자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeOp {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
}

impl RangeOp {
    pub fn sql(self) -> &'static str {
        match self {
            RangeOp::Gt => ">",
            RangeOp::Lt => "<",
            RangeOp::Gte => ">=",
            RangeOp::Lte => "<=",
            RangeOp::Eq => "=",
        }
    }
}

/// 경매 상태 범위 조건. 경매만 조회할 때만 적용된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRange {
    pub op: RangeOp,
    pub status: AuctionStatus,
}

/// 판매 상품 목록 검색 조건
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    /// 상품명/설명 검색어
    pub keyword: Option<String>,
    /// 판매 유형 서비스 키 (비어 있으면 전체)
    pub sales_types: Vec<String>,
    pub department_id: Option<i64>,
    pub device_type_id: Option<i64>,
    pub manufacturer_id: Option<i64>,
    pub company_area: Option<String>,
    pub owner_id: Option<i64>,
    pub status_range: Option<StatusRange>,
    /// 1부터 시작
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    /// 아주 큰 페이지 번호는 빈 페이지가 되도록 최댓값에서 멈춘다
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.page_size - 1) / self.page_size
        }
    }
}

impl CatalogFilter {
    /// 판매 유형을 주어진 종류로 제한한 사본
    pub fn restricted_to(&self, kinds: &[&str]) -> Self {
        Self {
            sales_types: kinds.iter().map(|kind| kind.to_string()).collect(),
            ..self.clone()
        }
    }

    /// 경매만 조회하는지 여부
    pub fn is_auction_only(&self) -> bool {
        !self.sales_types.is_empty() && self.sales_types.iter().all(|kind| kind == AUCTION_KIND)
    }

    pub fn pagination(&self) -> Pagination {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Pagination { page, page_size }
    }

    /// 공백을 제거한 검색어 (빈 문자열은 없음으로 취급)
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LISTING_KIND;

    #[test]
    fn pagination_defaults_and_caps() {
        let filter = CatalogFilter::default();
        assert_eq!(
            filter.pagination(),
            Pagination {
                page: 1,
                page_size: DEFAULT_PAGE_SIZE
            }
        );

        let filter = CatalogFilter {
            page: Some(0),
            page_size: Some(10_000),
            ..Default::default()
        };
        let pagination = filter.pagination();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_and_page_count() {
        let pagination = Pagination {
            page: 3,
            page_size: 20,
        };
        assert_eq!(pagination.offset(), 40);
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(20), 1);
        assert_eq!(pagination.total_pages(41), 3);
    }

    #[test]
    fn huge_page_numbers_saturate_the_offset() {
        let filter = CatalogFilter {
            page: Some(i64::MAX),
            ..Default::default()
        };
        assert_eq!(filter.pagination().offset(), i64::MAX);

        let pagination = Pagination {
            page: i64::MAX,
            page_size: MAX_PAGE_SIZE,
        };
        assert_eq!(pagination.offset(), i64::MAX);
    }

    #[test]
    fn auction_only_requires_an_explicit_auction_restriction() {
        let filter = CatalogFilter::default();
        assert!(!filter.is_auction_only());
        assert!(filter.restricted_to(&[AUCTION_KIND]).is_auction_only());
        assert!(!filter
            .restricted_to(&[AUCTION_KIND, LISTING_KIND])
            .is_auction_only());
    }

    #[test]
    fn blank_keyword_is_ignored() {
        let filter = CatalogFilter {
            keyword: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.keyword(), None);

        let filter = CatalogFilter {
            keyword: Some(" stent ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.keyword(), Some("stent"));
    }

    #[test]
    fn status_range_deserializes_from_snake_case() {
        let range: StatusRange =
            serde_json::from_value(serde_json::json!({"op": "gte", "status": "bidding"})).unwrap();
        assert_eq!(range.op, RangeOp::Gte);
        assert_eq!(range.status, AuctionStatus::Bidding);
    }
}
