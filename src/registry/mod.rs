/// 상품 종류 레지스트리
/// 판매 유형의 `service_name` 으로 실제 상품(경매/정가 판매) 서비스를 찾는다.
/// 프로세스 시작 시 한 번 채운 뒤 읽기 전용으로 공유한다.
// region:    --- Imports
use crate::auction::model::AuctionItem;
use crate::error::{MarketError, Result};
use crate::listing::ListingItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
// endregion: --- Imports

// region:    --- Kinds
/// 경매 상품 서비스 키
pub const AUCTION_KIND: &str = "auction";
/// 정가 판매 상품 서비스 키
pub const LISTING_KIND: &str = "listing";

/// 레지스트리가 돌려주는 실제 상품
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemRecord {
    Auction(AuctionItem),
    Listing(ListingItem),
}

impl ItemRecord {
    pub fn id(&self) -> i64 {
        match self {
            ItemRecord::Auction(item) => item.id,
            ItemRecord::Listing(item) => item.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ItemRecord::Auction(_) => AUCTION_KIND,
            ItemRecord::Listing(_) => LISTING_KIND,
        }
    }
}
// endregion: --- Kinds

// region:    --- Item Kind Service Trait
/// 상품 종류별 서비스 트레이트
#[async_trait]
pub trait ItemKindService: Send + Sync {
    /// 레지스트리 키
    fn kind(&self) -> &'static str;

    /// 상품 생성. `payload` 는 종류별 생성 구조체로 해석된다.
    async fn create(&self, conn: &mut PgConnection, payload: serde_json::Value)
        -> Result<ItemRecord>;

    /// 상품 조회
    async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<ItemRecord>>;
}
// endregion: --- Item Kind Service Trait

// region:    --- Registry
#[derive(Default, Clone)]
pub struct ItemKindRegistry {
    services: HashMap<String, Arc<dyn ItemKindService>>,
}

impl ItemKindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 서비스 등록
    pub fn register(&mut self, name: impl Into<String>, service: Arc<dyn ItemKindService>) {
        let name = name.into();
        info!("{:<12} --> 상품 종류 등록: {}", "Registry", name);
        self.services.insert(name, service);
    }

    /// 서비스 조회
    pub fn get(&self, name: &str) -> Result<Arc<dyn ItemKindService>> {
        debug!("{:<12} --> 상품 종류 조회: {}", "Registry", name);
        self.services
            .get(name)
            .cloned()
            .ok_or_else(|| MarketError::UnknownKind(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// 등록된 키 목록 (정렬)
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.services.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}
// endregion: --- Registry

#[cfg(test)]
mod tests {
    use super::*;

    struct NullService;

    #[async_trait]
    impl ItemKindService for NullService {
        fn kind(&self) -> &'static str {
            "null"
        }

        async fn create(
            &self,
            _conn: &mut PgConnection,
            _payload: serde_json::Value,
        ) -> Result<ItemRecord> {
            Err(MarketError::UnknownKind("null".into()))
        }

        async fn find_by_id(&self, _conn: &mut PgConnection, _id: i64) -> Result<Option<ItemRecord>> {
            Ok(None)
        }
    }

    #[test]
    fn registered_services_are_found_by_name() {
        let mut registry = ItemKindRegistry::new();
        registry.register("null", Arc::new(NullService));

        let service = registry.get("null").unwrap();
        assert_eq!(service.kind(), "null");
        assert!(registry.contains("null"));
    }

    #[test]
    fn unknown_names_fail_with_unknown_kind() {
        let registry = ItemKindRegistry::new();
        match registry.get("barter") {
            Err(MarketError::UnknownKind(name)) => assert_eq!(name, "barter"),
            _ => panic!("expected UnknownKind"),
        }
    }

    #[test]
    fn kinds_are_listed_in_order() {
        let mut registry = ItemKindRegistry::new();
        registry.register("zeta", Arc::new(NullService));
        registry.register("alpha", Arc::new(NullService));
        assert_eq!(registry.kinds(), vec!["alpha", "zeta"]);
    }
}
