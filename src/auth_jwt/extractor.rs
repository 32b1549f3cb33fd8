use crate::auth_jwt::auth::{verify_jwt, JwtSecret};
use crate::db_models::User;
use crate::errors::custom::CustomError;
use crate::schema::users::dsl as user_dsl;
use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use diesel::prelude::*;
use std::future::{ready, Ready};

/// Caller identity resolved from the bearer token in the `Authorization`
/// header. Protection varies per method on the same path, so this is an
/// extractor rather than a scope middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

impl FromRequest for AuthenticatedUser {
    type Error = CustomError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let secret = match req.app_data::<web::Data<JwtSecret>>() {
            Some(secret) => secret,
            None => {
                return ready(Err(CustomError::AuthenticationError(
                    "Token signing key not configured".to_string(),
                )))
            }
        };

        let result = bearer_token(req)
            .and_then(|token| {
                verify_jwt(&token, &secret.0).map_err(CustomError::AuthenticationError)
            })
            .and_then(|claims| {
                claims.sub.parse::<i32>().map_err(|_| {
                    CustomError::AuthenticationError("Malformed token subject".to_string())
                })
            })
            .map(|user_id| AuthenticatedUser { user_id });
        ready(result)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, CustomError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
        .ok_or_else(|| CustomError::AuthenticationError("Missing bearer token".to_string()))
}

/******************************************/
// Authorization guards
/******************************************/
// Every protected handler loads the caller's row first; a token whose user no
// longer exists is an authorization failure.
pub fn require_current_user(
    conn: &mut PgConnection,
    caller: AuthenticatedUser,
) -> Result<User, CustomError> {
    let user = user_dsl::users
        .find(caller.user_id)
        .first::<User>(conn)
        .optional()
        .map_err(|err| CustomError::DatabaseError(err.to_string()))?;

    user.ok_or_else(|| CustomError::AuthorizationError("User not found".to_string()))
}

pub fn require_admin(current_user: &User) -> Result<(), CustomError> {
    if !current_user.admin {
        return Err(CustomError::AuthorizationError(
            "Access denied. Admin only.".to_string(),
        ));
    }
    Ok(())
}

pub fn require_self_or_admin(current_user: &User, target_id: i32) -> Result<(), CustomError> {
    if !current_user.admin && current_user.id != target_id {
        return Err(CustomError::AuthorizationError(
            "Access denied. Admin only.".to_string(),
        ));
    }
    Ok(())
}
