/// 경매 상품 조회
pub const GET_AUCTION: &str = "SELECT * FROM auction_items WHERE id = $1";

/// 경매 상품 조회 (행 잠금)
pub const GET_AUCTION_FOR_UPDATE: &str = "SELECT * FROM auction_items WHERE id = $1 FOR UPDATE";

/// 경매 코드로 조회
pub const GET_AUCTION_BY_CODE: &str = "SELECT * FROM auction_items WHERE auction_code = $1";

/// 진료과 코드 조회
pub const GET_DEPARTMENT_CODE: &str = "SELECT code FROM departments WHERE id = $1";

/// 장비 종류 코드 조회
pub const GET_DEVICE_TYPE_CODE: &str = "SELECT code FROM device_types WHERE id = $1";

/// 경매 코드 접두어 잠금 (트랜잭션 종료 시 해제)
pub const LOCK_CODE_PREFIX: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";

/// 같은 접두어의 경매 수 (접두어는 패턴이 아닌 문자열 그대로 비교)
pub const COUNT_CODES_WITH_PREFIX: &str =
    "SELECT COUNT(*) FROM auction_items WHERE left(auction_code, char_length($1)) = $1";

/// 경매 상품 생성
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auction_items (
        auction_code, name, description, company_id, department_id, device_type_id,
        manufacturer_id, status, expired_count, start_timestamp, auction_timeout,
        visit_date, visit_time, quantity
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9, $10, $11, $12, $13)
    RETURNING *
"#;

/// 현재 최고 입찰 조회
pub const GET_LEADING_BID: &str = r#"
    SELECT * FROM auction_item_histories
    WHERE auction_item_id = $1 AND status = $2
    ORDER BY value DESC, id ASC
    LIMIT 1
"#;

/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO auction_item_histories (auction_item_id, user_id, value, status, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $5)
    RETURNING *
"#;

/// 입찰 반영: 최고 입찰자 지정, 양측 1단계, 타임아웃 설정
pub const APPLY_BID: &str = r#"
    UPDATE auction_items
    SET status = $2, accept_id = $3, seller_steps = 1, buyer_steps = 1,
        seller_timeout = $4, buyer_timeout = $4, updated_at = $5
    WHERE id = $1
    RETURNING *
"#;

/// 입찰자 프로필 조회
pub const GET_BIDDER_PROFILE: &str = "SELECT id, name, email, phone FROM users WHERE id = $1";

/// 보증금 확인
pub const CONFIRM_DEPOSIT: &str = r#"
    UPDATE auction_items
    SET status = $2, seller_steps = 3, buyer_steps = 3, updated_at = $3
    WHERE id = $1
    RETURNING *
"#;

/// 판매자 낙찰 승인
pub const ACCEPT_LEADING_BID: &str = r#"
    UPDATE auction_items
    SET seller_steps = 2, buyer_timeout = $2, updated_at = $3
    WHERE id = $1
    RETURNING *
"#;

/// 구매자 낙찰 확인
pub const ACKNOWLEDGE_AWARD: &str = r#"
    UPDATE auction_items
    SET buyer_steps = 2, updated_at = $2
    WHERE id = $1
    RETURNING *
"#;

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT * FROM auction_item_histories
    WHERE auction_item_id = $1
    ORDER BY created_at DESC, id DESC
"#;
