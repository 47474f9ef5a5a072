/// 판매 상품 통합 조회 쿼리 생성
/// 판매 상품 한 행에 경매/정가 상품 테이블을 모두 LEFT JOIN 하되,
/// 판매 유형의 `service_name` 이 맞는 쪽만 값이 채워지도록 조인 조건을 건다.
/// 모든 조건 값은 바인드 파라미터로만 전달한다.
// region:    --- Imports
use super::filter::CatalogFilter;
use crate::auction::model::AuctionStatus;
use crate::registry::{AUCTION_KIND, LISTING_KIND};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use tracing::debug;
// endregion: --- Imports

// region:    --- Query Templates
const SELECT_COLUMNS: &str = "\
    s.id AS sale_item_id, s.owner_id, s.item_id, s.status AS sale_status, s.updated_at, \
    st.id AS sales_type_id, st.code AS sales_type_code, st.service_name, \
    a.id AS auction_id, a.auction_code, a.name AS auction_name, \
    a.description AS auction_description, a.status AS auction_status, a.accept_id, \
    a.start_timestamp, a.auction_timeout, a.expired_count, a.quantity AS auction_quantity, \
    l.id AS listing_id, l.name AS listing_name, l.description AS listing_description, \
    l.price, l.quantity AS listing_quantity, l.status AS listing_status, \
    c.id AS company_id, c.name AS company_name, c.area AS company_area, \
    d.id AS department_id, d.name AS department_name, \
    dt.id AS device_type_id, dt.name AS device_type_name, \
    m.id AS manufacturer_id, m.name AS manufacturer_name";

const ORDER_BY: &str = "ORDER BY s.updated_at DESC, s.id DESC";
// endregion: --- Query Templates

// region:    --- Bind Values
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Status(AuctionStatus),
    TextList(Vec<String>),
}

/// 생성된 SQL 과 순서대로 바인드할 값
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl CatalogQuery {
    /// 쿼리에 값을 순서대로 바인드
    pub fn bind_to<'q, O>(
        &self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for value in &self.binds {
            query = match value {
                BindValue::Text(v) => query.bind(v.clone()),
                BindValue::Int(v) => query.bind(*v),
                BindValue::Status(v) => query.bind(*v),
                BindValue::TextList(v) => query.bind(v.clone()),
            };
        }
        query
    }
}

#[derive(Default)]
struct Params {
    binds: Vec<BindValue>,
}

impl Params {
    /// 값을 추가하고 자리표시자(`$n`)를 돌려준다
    fn push(&mut self, value: BindValue) -> String {
        self.binds.push(value);
        format!("${}", self.binds.len())
    }
}
// endregion: --- Bind Values

// region:    --- Planner
/// 페이지 조회 쿼리
pub fn plan_page(filter: &CatalogFilter) -> CatalogQuery {
    let mut params = Params::default();
    let from_where = plan_from_where(filter, &mut params);

    let pagination = filter.pagination();
    let limit = params.push(BindValue::Int(pagination.page_size));
    let offset = params.push(BindValue::Int(pagination.offset()));

    CatalogQuery {
        sql: format!("SELECT {SELECT_COLUMNS} {from_where} {ORDER_BY} LIMIT {limit} OFFSET {offset}"),
        binds: params.binds,
    }
}

/// 전체 건수 조회 쿼리 (페이지 조회와 같은 조인/조건)
pub fn plan_count(filter: &CatalogFilter) -> CatalogQuery {
    let mut params = Params::default();
    let from_where = plan_from_where(filter, &mut params);

    CatalogQuery {
        sql: format!("SELECT COUNT(*) {from_where}"),
        binds: params.binds,
    }
}

fn plan_from_where(filter: &CatalogFilter, params: &mut Params) -> String {
    let auction_kind = params.push(BindValue::Text(AUCTION_KIND.to_string()));
    let listing_kind = params.push(BindValue::Text(LISTING_KIND.to_string()));

    let from = format!(
        "FROM sale_items s \
         JOIN sales_types st ON st.id = s.sales_type \
         LEFT JOIN auction_items a ON st.service_name = {auction_kind} AND a.id = s.item_id \
         LEFT JOIN listing_items l ON st.service_name = {listing_kind} AND l.id = s.item_id \
         LEFT JOIN companies c ON c.id = COALESCE(a.company_id, l.company_id) \
         LEFT JOIN departments d ON d.id = COALESCE(a.department_id, l.department_id) \
         LEFT JOIN device_types dt ON dt.id = COALESCE(a.device_type_id, l.device_type_id) \
         LEFT JOIN manufacturers m ON m.id = COALESCE(a.manufacturer_id, l.manufacturer_id)"
    );

    // 실제 상품이 없는 판매 상품은 제외
    let mut conditions = vec!["(a.id IS NOT NULL OR l.id IS NOT NULL)".to_string()];

    if let Some(keyword) = filter.keyword() {
        let p = params.push(BindValue::Text(format!("%{}%", escape_like(keyword))));
        conditions.push(format!(
            "(a.name ILIKE {p} OR a.description ILIKE {p} OR l.name ILIKE {p} OR l.description ILIKE {p})"
        ));
    }
    if !filter.sales_types.is_empty() {
        let p = params.push(BindValue::TextList(filter.sales_types.clone()));
        conditions.push(format!("st.service_name = ANY({p})"));
    }
    if let Some(department_id) = filter.department_id {
        let p = params.push(BindValue::Int(department_id));
        conditions.push(format!("d.id = {p}"));
    }
    if let Some(device_type_id) = filter.device_type_id {
        let p = params.push(BindValue::Int(device_type_id));
        conditions.push(format!("dt.id = {p}"));
    }
    if let Some(manufacturer_id) = filter.manufacturer_id {
        let p = params.push(BindValue::Int(manufacturer_id));
        conditions.push(format!("m.id = {p}"));
    }
    if let Some(area) = filter.company_area.as_deref() {
        let p = params.push(BindValue::Text(area.to_string()));
        conditions.push(format!("c.area = {p}"));
    }
    if let Some(owner_id) = filter.owner_id {
        let p = params.push(BindValue::Int(owner_id));
        conditions.push(format!("s.owner_id = {p}"));
    }
    if let Some(range) = filter.status_range {
        if filter.is_auction_only() {
            let p = params.push(BindValue::Status(range.status));
            conditions.push(format!("a.status {} {p}", range.op.sql()));
        } else {
            debug!(
                "{:<12} --> 경매 전용 조회가 아니므로 상태 조건 무시: {:?}",
                "Catalog", range
            );
        }
    }

    format!("{from} WHERE {}", conditions.join(" AND "))
}

/// LIKE 패턴 특수문자 이스케이프
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
// endregion: --- Planner
