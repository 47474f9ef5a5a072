pub mod model;
pub mod service;

pub use model::{NewSaleItem, SaleItem, SaleItemWithItem, SalesType};
pub use service::SaleItemService;
