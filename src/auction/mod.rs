pub mod commands;
pub mod model;
pub mod queries;
pub mod service;

pub use model::{AuctionItem, AuctionItemHistory, AuctionPhase, AuctionStatus, BidStatus};
pub use service::AuctionService;
