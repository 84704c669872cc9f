pub mod cart;
pub mod catalog;
pub mod orders;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use orders::{OrderService, PlaceOrderInput};
