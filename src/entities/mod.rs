//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod menu;
pub mod menu_variant;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod product;
pub mod product_category;
pub mod user;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use menu::{Column as MenuColumn, Entity as Menu, Model as MenuModel};
pub use menu_variant::{
    Column as MenuVariantColumn, Entity as MenuVariant, Model as MenuVariantModel,
};
pub use order::{
    Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus, ServiceType,
};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel, PaymentMode};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_category::{Entity as ProductCategory, Model as ProductCategoryModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
