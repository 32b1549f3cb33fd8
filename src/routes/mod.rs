pub mod health_check;
pub mod order;
pub mod product;
pub mod user;
