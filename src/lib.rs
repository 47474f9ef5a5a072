pub mod auction;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod listing;
pub mod registry;
pub mod sale_item;
pub mod scheduler;

pub use error::{MarketError, Result};

// region:    --- Services
use std::sync::Arc;

/// 프로세스 시작 시 한 번 구성해 요청 처리기에 넘기는 서비스 묶음
pub struct Services {
    pub registry: Arc<registry::ItemKindRegistry>,
    pub auctions: Arc<auction::AuctionService>,
    pub listings: Arc<listing::ListingService>,
    pub sale_items: Arc<sale_item::SaleItemService>,
    pub scheduler: Arc<scheduler::AuctionScheduler>,
}

impl Services {
    /// 레지스트리에 모든 상품 종류를 등록하고 서비스를 구성
    pub fn build(
        db_manager: Arc<database::DatabaseManager>,
        sweep_interval: std::time::Duration,
    ) -> Self {
        let auctions = Arc::new(auction::AuctionService::new(Arc::clone(&db_manager)));
        let listings = Arc::new(listing::ListingService::new(Arc::clone(&db_manager)));

        let mut kinds = registry::ItemKindRegistry::new();
        kinds.register(registry::AUCTION_KIND, auctions.clone());
        kinds.register(registry::LISTING_KIND, listings.clone());
        let registry = Arc::new(kinds);

        let sale_items = Arc::new(sale_item::SaleItemService::new(
            Arc::clone(&db_manager),
            Arc::clone(&registry),
        ));
        let scheduler = Arc::new(scheduler::AuctionScheduler::new(db_manager, sweep_interval));

        Self {
            registry,
            auctions,
            listings,
            sale_items,
            scheduler,
        }
    }
}
// endregion: --- Services
