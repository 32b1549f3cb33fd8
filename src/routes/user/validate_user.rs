use crate::db::PgPool;
use crate::errors::custom::CustomError;
use crate::routes::user::user::LoginUserBody;
use crate::schema::users::dsl::*;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use diesel::prelude::*;
use tracing::instrument;

#[instrument(name = "Get stored credentials", skip(user_email, pool), fields(email = %user_email))]
fn get_stored_credentials(user_email: &str, pool: &PgPool) -> Result<(i32, String), CustomError> {
    let mut conn = pool.get().expect("Failed to get db connection from pool");

    // Email is unique, so at most one row comes back.
    let row = users
        .filter(email.eq(user_email))
        .select((id, password_hash))
        .first::<(i32, String)>(&mut conn)
        .optional()
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    row.ok_or_else(|| CustomError::AuthenticationError("Invalid email or password".to_string()))
}

#[instrument(name = "Verify password", skip(expected_hash, candidate))]
fn verify_password(expected_hash: &str, candidate: &str) -> Result<bool, CustomError> {
    let argon2 = Argon2::default();
    let parsed_hash = PasswordHash::new(expected_hash)
        .map_err(|err| CustomError::HashingError(err.to_string()))?;

    Ok(argon2
        .verify_password(candidate.as_bytes(), &parsed_hash)
        .is_ok())
}

#[instrument(name = "Validate credentials", skip(req_login, pool), fields(email = %req_login.email))]
pub fn validate_credentials(pool: &PgPool, req_login: &LoginUserBody) -> Result<i32, CustomError> {
    let (user_id, stored_password_hash) = get_stored_credentials(&req_login.email, pool)?;

    let is_valid = verify_password(&stored_password_hash, &req_login.password)?;
    if is_valid {
        Ok(user_id)
    } else {
        Err(CustomError::AuthenticationError(
            "Invalid email or password".to_string(),
        ))
    }
}
