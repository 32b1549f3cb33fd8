use super::validate_user::validate_credentials;
use crate::auth_jwt::auth::{create_jwt, JwtSecret};
use crate::auth_jwt::extractor::{
    require_admin, require_current_user, require_self_or_admin, AuthenticatedUser,
};
use crate::db::PgPool;
use crate::db_models::{NewUser, User, UserChangeset, UserListing};
use crate::errors::custom::CustomError;
use crate::schema::users::dsl as user_dsl;
use actix_web::{web, HttpResponse};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use crate::validations::fields::{UserAddress, UserEmail, UserName};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

const PAGE_SIZE: i64 = 5;

#[derive(Deserialize)]
pub struct CreateUserBody {
    name: String,
    address: String,
    email: String,
    password: String,
    admin: bool,
}

impl CreateUserBody {
    pub fn validate(self) -> Result<(UserName, UserAddress, UserEmail), String> {
        let user_name = UserName::parse(self.name)?;
        let user_address = UserAddress::parse(self.address)?;
        let user_email = UserEmail::parse(self.email)?;
        Ok((user_name, user_address, user_email))
    }
}

#[derive(Deserialize)]
pub struct LoginUserBody {
    pub email: String,
    pub password: String,
}

// Presence-aware partial update: absent (or empty) fields leave the stored
// value unchanged; `admin` is applied whenever present, including `false`.
#[derive(Deserialize)]
pub struct UpdateUserBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    admin: Option<bool>,
}

impl UpdateUserBody {
    fn into_changeset(self) -> Result<UserChangeset, CustomError> {
        let name = match non_empty(self.name) {
            Some(value) => Some(
                UserName::parse(value)
                    .map_err(CustomError::ValidationError)?
                    .as_ref()
                    .to_string(),
            ),
            None => None,
        };
        let address = match non_empty(self.address) {
            Some(value) => Some(
                UserAddress::parse(value)
                    .map_err(CustomError::ValidationError)?
                    .as_ref()
                    .to_string(),
            ),
            None => None,
        };
        let email = match non_empty(self.email) {
            Some(value) => Some(
                UserEmail::parse(value)
                    .map_err(CustomError::ValidationError)?
                    .as_ref()
                    .to_string(),
            ),
            None => None,
        };
        let password_hash = match non_empty(self.password) {
            Some(value) => Some(hash_password(&value)?),
            None => None,
        };

        Ok(UserChangeset {
            name,
            address,
            email,
            password_hash,
            admin: self.admin,
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn generate_random_salt() -> SaltString {
    SaltString::generate(&mut rand::thread_rng())
}

fn hash_password(password: &str) -> Result<String, CustomError> {
    let argon2 = Argon2::default();
    let salt = generate_random_salt();
    let password_hashed = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| CustomError::HashingError(err.to_string()))?;
    Ok(password_hashed.to_string())
}

fn map_duplicate_email(err: diesel::result::Error) -> CustomError {
    match err {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CustomError::ConflictError("Duplicate email".to_string())
        }
        other => CustomError::DatabaseError(other.to_string()),
    }
}

/******************************************/
// Login Route
/******************************************/
/**
 * @route   POST /login
 * @access  Public
 */
#[instrument(name = "Login a user", skip(req_login, pool, secret), fields(email = %req_login.email))]
pub async fn login_user(
    pool: web::Data<PgPool>,
    secret: web::Data<JwtSecret>,
    req_login: web::Json<LoginUserBody>,
) -> Result<HttpResponse, CustomError> {
    let pool = pool.clone();
    let credentials = req_login.into_inner();

    let user_id = web::block(move || validate_credentials(&pool, &credentials))
        .await
        .map_err(|err| CustomError::BlockingError(err.to_string()))??;

    let token =
        create_jwt(&user_id.to_string(), &secret.0).map_err(CustomError::AuthenticationError)?;
    Ok(HttpResponse::Ok().json(json!({ "access_token": token })))
}

/******************************************/
// Registering User Route
/******************************************/
/**
 * @route   POST /users
 * @access  Public
 */
#[instrument(name = "Register a new user", skip(req_user, pool), fields(email = %req_user.email))]
pub async fn create_user(
    pool: web::Data<PgPool>,
    req_user: web::Json<CreateUserBody>,
) -> Result<HttpResponse, CustomError> {
    let pool = pool.clone();
    let user_data = req_user.into_inner();
    let user_password = user_data.password.clone();
    let user_admin = user_data.admin;

    if user_password.trim().is_empty() {
        return Err(CustomError::ValidationError(
            "Empty value detected.".to_string(),
        ));
    }
    let (validated_name, validated_address, validated_email) = user_data
        .validate()
        .map_err(CustomError::ValidationError)?;

    let created = web::block(move || {
        let mut conn = pool.get().expect("Failed to get db connection from Pool");
        let password_hashed = hash_password(&user_password)?;

        let new_user = NewUser {
            name: validated_name.as_ref().to_string(),
            address: validated_address.as_ref().to_string(),
            email: validated_email.as_ref().to_string(),
            password_hash: password_hashed,
            admin: user_admin,
        };

        diesel::insert_into(user_dsl::users)
            .values(&new_user)
            .get_result::<User>(&mut conn)
            .map_err(map_duplicate_email)
    })
    .await
    .map_err(|err| CustomError::BlockingError(err.to_string()))??;

    Ok(HttpResponse::Created().json(created))
}

/******************************************/
// Listing All Users Route
/******************************************/
/**
 * @route   GET /users
 * @access  JWT Protected, Admin only
 */
#[instrument(name = "Get all users", skip(pool, auth))]
pub async fn get_users(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let current_user = require_current_user(&mut conn, auth)?;
    require_admin(&current_user)?;

    let users = user_dsl::users
        .order(user_dsl::id.asc())
        .load::<User>(&mut conn)
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    Ok(HttpResponse::Ok().json(users))
}

/******************************************/
// Paginated User Listing Route
/******************************************/
/**
 * @route   GET /users/paginate/{page}
 * @access  JWT Protected, Admin only
 */
#[instrument(name = "Get users paginated", skip(pool, auth))]
pub async fn get_users_paginated(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    page: web::Path<i64>,
) -> Result<HttpResponse, CustomError> {
    let page = page.into_inner();
    if page < 1 {
        return Err(CustomError::ValidationError(
            "Page numbers start at 1".to_string(),
        ));
    }

    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let current_user = require_current_user(&mut conn, auth)?;
    require_admin(&current_user)?;

    let users = user_dsl::users
        .order(user_dsl::id.asc())
        .select((user_dsl::name, user_dsl::email, user_dsl::address))
        .limit(PAGE_SIZE)
        .offset((page - 1) * PAGE_SIZE)
        .load::<UserListing>(&mut conn)
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    Ok(HttpResponse::Ok().json(users))
}

/******************************************/
// View Single User Route
/******************************************/
/**
 * @route   GET /users/{id}
 * @access  JWT Protected, Self or Admin
 */
#[instrument(name = "Get user", skip(pool, auth))]
pub async fn get_user(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    target_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let target_id = target_id.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let current_user = require_current_user(&mut conn, auth)?;
    require_self_or_admin(&current_user, target_id)?;

    let user = user_dsl::users
        .find(target_id)
        .first::<User>(&mut conn)
        .optional()
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?
        .ok_or_else(|| CustomError::NotFoundError("User id not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}

/******************************************/
// Updating User Route
/******************************************/
/**
 * @route   PUT /users/{id}
 * @access  JWT Protected, Self or Admin
 */
#[instrument(name = "Update user", skip(req_user, pool, auth))]
pub async fn update_user(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    target_id: web::Path<i32>,
    req_user: web::Json<UpdateUserBody>,
) -> Result<HttpResponse, CustomError> {
    let target_id = target_id.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let current_user = require_current_user(&mut conn, auth)?;
    require_self_or_admin(&current_user, target_id)?;

    let changeset = req_user.into_inner().into_changeset()?;

    let updated = conn.transaction::<User, CustomError, _>(|conn| {
        let target = user_dsl::users
            .find(target_id)
            .first::<User>(conn)
            .optional()
            .map_err(|err| CustomError::DatabaseError(err.to_string()))?
            .ok_or_else(|| CustomError::NotFoundError("User not found".to_string()))?;

        if !changeset.has_changes() {
            return Ok(target);
        }

        diesel::update(user_dsl::users.find(target_id))
            .set(&changeset)
            .get_result::<User>(conn)
            .map_err(map_duplicate_email)
    })?;

    Ok(HttpResponse::Ok().json(updated))
}

/******************************************/
// Deleting User Route
/******************************************/
/**
 * @route   DELETE /users/{id}
 * @access  JWT Protected, Self or Admin
 */
#[instrument(name = "Delete user", skip(pool, auth))]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    target_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let target_id = target_id.into_inner();
    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    let current_user = require_current_user(&mut conn, auth)?;
    require_self_or_admin(&current_user, target_id)?;

    let deleted = diesel::delete(user_dsl::users.find(target_id))
        .execute(&mut conn)
        .map_err(CustomError::from)?;

    if deleted == 0 {
        return Err(CustomError::NotFoundError("User not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("user {} successfully deleted", target_id)
    })))
}
