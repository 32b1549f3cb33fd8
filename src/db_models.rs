use crate::schema::{order_products, orders, products, users};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;

/******************************************/
// Users
/******************************************/
#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub admin: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub address: String,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
}

// Partial update: `None` fields are left untouched by diesel's changeset.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub admin: Option<bool>,
}

impl UserChangeset {
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.address.is_some()
            || self.email.is_some()
            || self.password_hash.is_some()
            || self.admin.is_some()
    }
}

// Reduced field set for paginated listing views.
#[derive(Debug, Queryable, Serialize)]
pub struct UserListing {
    pub name: String,
    pub email: String,
    pub address: String,
}

/******************************************/
// Products
/******************************************/
#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = products)]
pub struct Product {
    pub id: i32,
    pub product_name: String,
    pub price: f64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub product_name: String,
    pub price: f64,
}

/******************************************/
// Orders
/******************************************/
#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = orders)]
pub struct Order {
    pub id: i32,
    pub order_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub user_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub order_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub user_id: i32,
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = order_products)]
pub struct OrderProduct {
    pub order_id: i32,
    pub product_id: i32,
}
