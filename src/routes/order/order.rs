use crate::db::PgPool;
use crate::db_models::{NewOrder, Order, OrderProduct, Product, User};
use crate::errors::custom::CustomError;
use crate::schema::order_products::dsl as pairing_dsl;
use crate::schema::orders::dsl as order_dsl;
use crate::schema::products::dsl as product_dsl;
use crate::schema::users::dsl as user_dsl;
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

#[derive(Deserialize)]
pub struct CreateOrderBody {
    pub user_id: i32,
    // "YYYY-MM-DD"
    pub order_date: NaiveDate,
}

fn find_order(conn: &mut PgConnection, order_id: i32) -> Result<Option<Order>, CustomError> {
    order_dsl::orders
        .find(order_id)
        .first::<Order>(conn)
        .optional()
        .map_err(|err| CustomError::DatabaseError(err.to_string()))
}

fn find_product(conn: &mut PgConnection, product_id: i32) -> Result<Option<Product>, CustomError> {
    product_dsl::products
        .find(product_id)
        .first::<Product>(conn)
        .optional()
        .map_err(|err| CustomError::DatabaseError(err.to_string()))
}

/******************************************/
// New Order Creation route
/******************************************/
/**
 * @route   POST /orders
 * @access  Public
 */
#[instrument(name = "Create new Order", skip(req_order, pool), fields(user_id = %req_order.user_id))]
pub async fn create_order(
    pool: web::Data<PgPool>,
    req_order: web::Json<CreateOrderBody>,
) -> Result<HttpResponse, CustomError> {
    let order_data = req_order.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");

    let order = conn.transaction::<Order, CustomError, _>(|conn| {
        let user = user_dsl::users
            .find(order_data.user_id)
            .first::<User>(conn)
            .optional()
            .map_err(|err| CustomError::DatabaseError(err.to_string()))?;
        if user.is_none() {
            return Err(CustomError::NotFoundError("User not found".to_string()));
        }

        let new_order = NewOrder {
            order_date: order_data.order_date,
            created_at: Utc::now().naive_utc(),
            user_id: order_data.user_id,
        };

        diesel::insert_into(order_dsl::orders)
            .values(&new_order)
            .get_result::<Order>(conn)
            .map_err(|err| CustomError::DatabaseError(err.to_string()))
    })?;

    Ok(HttpResponse::Created().json(order))
}

/******************************************/
// Adding a Product to an Order
/******************************************/
/**
 * @route   PUT /orders/{order_id}/add_product/{product_id}
 * @access  Public
 */
#[instrument(name = "Add product to order", skip(pool))]
pub async fn add_product_to_order(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, CustomError> {
    let (order_id, product_id) = path.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");

    conn.transaction::<(), CustomError, _>(|conn| {
        let order = find_order(conn, order_id)?;
        let product = find_product(conn, product_id)?;
        if order.is_none() || product.is_none() {
            return Err(CustomError::NotFoundError(
                "Order and/or product not found.".to_string(),
            ));
        }

        // The composite primary key rejects a duplicate pairing.
        diesel::insert_into(pairing_dsl::order_products)
            .values(&OrderProduct {
                order_id,
                product_id,
            })
            .execute(conn)
            .map_err(|err| match err {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    CustomError::ConflictError(format!(
                        "Product #{} already in order #{}",
                        product_id, order_id
                    ))
                }
                other => CustomError::DatabaseError(other.to_string()),
            })?;
        Ok(())
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Product #{} added to order #{}", product_id, order_id)
    })))
}

/******************************************/
// Removing a Product from an Order
/******************************************/
/**
 * @route   DELETE /orders/{order_id}/remove_product/{product_id}
 * @access  Public
 */
#[instrument(name = "Remove product from order", skip(pool))]
pub async fn remove_product_from_order(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, CustomError> {
    let (order_id, product_id) = path.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");

    conn.transaction::<(), CustomError, _>(|conn| {
        let order = find_order(conn, order_id)?;
        let product = find_product(conn, product_id)?;
        if order.is_none() || product.is_none() {
            return Err(CustomError::NotFoundError(
                "Order/product not found".to_string(),
            ));
        }

        let deleted = diesel::delete(pairing_dsl::order_products.find((order_id, product_id)))
            .execute(conn)
            .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

        if deleted == 0 {
            return Err(CustomError::NotFoundError(format!(
                "Product #{} not in order #{}.",
                product_id, order_id
            )));
        }
        Ok(())
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Product removed from order #{}", order_id)
    })))
}

/******************************************/
// Listing All Orders of a User
/******************************************/
/**
 * @route   GET /orders/user/{user_id}
 * @access  Public
 */
#[instrument(name = "Get all orders of a user", skip(pool))]
pub async fn get_user_orders(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let user_id = user_id.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");

    let user = user_dsl::users
        .find(user_id)
        .first::<User>(&mut conn)
        .optional()
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;
    if user.is_none() {
        return Err(CustomError::NotFoundError("User not found".to_string()));
    }

    let orders = order_dsl::orders
        .filter(order_dsl::user_id.eq(user_id))
        .order(order_dsl::id.asc())
        .load::<Order>(&mut conn)
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    Ok(HttpResponse::Ok().json(orders))
}

/******************************************/
// Listing All Products of an Order
/******************************************/
/**
 * @route   GET /orders/{order_id}/products
 * @access  Public
 */
#[instrument(name = "Get all products of an order", skip(pool))]
pub async fn get_order_products(
    pool: web::Data<PgPool>,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let order_id = order_id.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");

    let order = find_order(&mut conn, order_id)?;
    if order.is_none() {
        return Err(CustomError::NotFoundError("Order not found".to_string()));
    }

    let products = pairing_dsl::order_products
        .inner_join(product_dsl::products)
        .filter(pairing_dsl::order_id.eq(order_id))
        .select((
            product_dsl::id,
            product_dsl::product_name,
            product_dsl::price,
        ))
        .order(product_dsl::id.asc())
        .load::<Product>(&mut conn)
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    // An order with nothing in it gets an explicit message, not an empty array.
    if products.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({ "message": "Order is currently empty." })));
    }

    Ok(HttpResponse::Ok().json(products))
}
