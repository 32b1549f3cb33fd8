use crate::auth_jwt::extractor::{require_admin, require_current_user, AuthenticatedUser};
use crate::db::PgPool;
use crate::db_models::{NewProduct, Product};
use crate::errors::custom::CustomError;
use crate::schema::products::dsl as product_dsl;
use crate::validations::fields::ProductName;
use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

const PAGE_SIZE: i64 = 5;

#[derive(Deserialize)]
pub struct CreateProductBody {
    product_name: String,
    price: f64,
}

#[derive(Deserialize)]
pub struct UpdateProductBody {
    // New price is applied unconditionally; the name only when non-empty.
    #[serde(default)]
    product_name: Option<String>,
    price: f64,
}

/******************************************/
// Listing All Products Route
/******************************************/
/**
 * @route   GET /products
 * @access  Public
 */
#[instrument(name = "Get all products", skip(pool))]
pub async fn get_products(pool: web::Data<PgPool>) -> Result<HttpResponse, CustomError> {
    let mut conn = pool.get().expect("Failed to get db connection from Pool");

    let products = product_dsl::products
        .order(product_dsl::id.asc())
        .load::<Product>(&mut conn)
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    Ok(HttpResponse::Ok().json(products))
}

/******************************************/
// Paginated Product Listing Route
/******************************************/
/**
 * @route   GET /products/paginate/{page}
 * @access  Public
 */
#[instrument(name = "Get products paginated", skip(pool))]
pub async fn get_products_paginated(
    pool: web::Data<PgPool>,
    page: web::Path<i64>,
) -> Result<HttpResponse, CustomError> {
    let page = page.into_inner();
    if page < 1 {
        return Err(CustomError::ValidationError(
            "Page numbers start at 1".to_string(),
        ));
    }

    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let products = product_dsl::products
        .order(product_dsl::id.asc())
        .limit(PAGE_SIZE)
        .offset((page - 1) * PAGE_SIZE)
        .load::<Product>(&mut conn)
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    Ok(HttpResponse::Ok().json(products))
}

/******************************************/
// View Single Product Route
/******************************************/
/**
 * @route   GET /products/{id}
 * @access  Public
 */
#[instrument(name = "Get product", skip(pool))]
pub async fn get_product(
    pool: web::Data<PgPool>,
    product_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let mut conn = pool.get().expect("Failed to get db connection from Pool");

    let product = product_dsl::products
        .find(product_id.into_inner())
        .first::<Product>(&mut conn)
        .optional()
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?
        .ok_or_else(|| CustomError::NotFoundError("product id not found".to_string()))?;

    Ok(HttpResponse::Ok().json(product))
}

/******************************************/
// Creating Product Route
/******************************************/
/**
 * @route   POST /products
 * @access  JWT Protected, Admin only
 */
#[instrument(name = "Create product", skip(req_product, pool, auth), fields(product_name = %req_product.product_name))]
pub async fn create_product(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    req_product: web::Json<CreateProductBody>,
) -> Result<HttpResponse, CustomError> {
    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let current_user = require_current_user(&mut conn, auth)?;
    require_admin(&current_user)?;

    let product_data = req_product.into_inner();
    let validated_name =
        ProductName::parse(product_data.product_name).map_err(CustomError::ValidationError)?;
    if product_data.price <= 0.0 {
        return Err(CustomError::ValidationError(
            "price must be a positive number".to_string(),
        ));
    }

    let new_product = NewProduct {
        product_name: validated_name.as_ref().to_string(),
        price: product_data.price,
    };

    let product = diesel::insert_into(product_dsl::products)
        .values(&new_product)
        .get_result::<Product>(&mut conn)
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    Ok(HttpResponse::Created().json(product))
}

/******************************************/
// Updating Product Route
/******************************************/
/**
 * @route   PUT /products/{id}
 * @access  JWT Protected, Admin only
 */
#[instrument(name = "Update product", skip(req_product, pool, auth))]
pub async fn update_product(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    product_id: web::Path<i32>,
    req_product: web::Json<UpdateProductBody>,
) -> Result<HttpResponse, CustomError> {
    let product_id = product_id.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let current_user = require_current_user(&mut conn, auth)?;
    require_admin(&current_user)?;

    let updates = req_product.into_inner();
    if updates.price < 0.0 {
        return Err(CustomError::ValidationError(
            "price must be non-negative".to_string(),
        ));
    }
    let validated_name = match updates.product_name.filter(|name| !name.trim().is_empty()) {
        Some(name) => Some(ProductName::parse(name).map_err(CustomError::ValidationError)?),
        None => None,
    };

    let product = conn.transaction::<Product, CustomError, _>(|conn| {
        product_dsl::products
            .find(product_id)
            .first::<Product>(conn)
            .optional()
            .map_err(|err| CustomError::DatabaseError(err.to_string()))?
            .ok_or_else(|| CustomError::NotFoundError("Product not found".to_string()))?;

        let updated = match validated_name {
            Some(name) => diesel::update(product_dsl::products.find(product_id))
                .set((
                    product_dsl::product_name.eq(name.as_ref().to_string()),
                    product_dsl::price.eq(updates.price),
                ))
                .get_result::<Product>(conn),
            None => diesel::update(product_dsl::products.find(product_id))
                .set(product_dsl::price.eq(updates.price))
                .get_result::<Product>(conn),
        }
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

        Ok(updated)
    })?;

    Ok(HttpResponse::Ok().json(product))
}

/******************************************/
// Deleting Product Route
/******************************************/
/**
 * @route   DELETE /products/{id}
 * @access  JWT Protected, Admin only
 */
#[instrument(name = "Delete product", skip(pool, auth))]
pub async fn delete_product(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    product_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let product_id = product_id.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let current_user = require_current_user(&mut conn, auth)?;
    require_admin(&current_user)?;

    // Join-table rows go with it via ON DELETE CASCADE.
    let deleted = diesel::delete(product_dsl::products.find(product_id))
        .execute(&mut conn)
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    if deleted == 0 {
        return Err(CustomError::NotFoundError("product not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Product Deleted!" })))
}
