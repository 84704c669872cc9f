//! sea-orm entities for the storefront tables

pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;

pub use cart_item::{Entity as CartItem, Model as CartItemModel};
pub use category::{Entity as Category, Model as CategoryModel};
pub use order::{Entity as Order, Model as OrderModel};
pub use order_item::{Entity as OrderItem, Model as OrderItemModel};
pub use product::{Entity as Product, Model as ProductModel};
