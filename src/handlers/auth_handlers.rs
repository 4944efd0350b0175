use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::models::user_models::{NewUser, User};
use crate::oauth::GoogleOAuth;
use crate::schema::users::dsl::*;
use crate::utils::token_utils::generate_jwt;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub code: String,
}

/// Exchange a Google authorization code for a session token, creating the
/// user on first registration. Upstream failures abort with a 502 instead
/// of continuing on a missing token.
pub async fn register(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    oauth: web::Data<GoogleOAuth>,
    payload: web::Json<RegisterRequest>,
) -> impl Responder {
    let access_token = match oauth.exchange_code(&payload.code).await {
        Ok(t) => t,
        Err(e) => {
            log::error!("Google token exchange failed: {e}");
            return HttpResponse::BadGateway().body("Falha na autenticação com o Google.");
        }
    };

    let profile = match oauth.fetch_profile(&access_token).await {
        Ok(p) => p,
        Err(e) => {
            log::error!("Google profile fetch failed: {e}");
            return HttpResponse::BadGateway().body("Falha na autenticação com o Google.");
        }
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let user = match find_or_create_user(&mut conn, &profile) {
        Ok(u) => u,
        Err(_) => return HttpResponse::InternalServerError().body("Failed to create user"),
    };

    let token = generate_jwt(&user, &config.jwt_secret);
    HttpResponse::Ok().json(serde_json::json!({ "token": token }))
}

/// Look the user up by provider id, creating the row on first registration.
/// An existing user is returned as-is; profile changes flow through the
/// profile-update endpoint, not through login.
pub fn find_or_create_user(
    conn: &mut diesel::SqliteConnection,
    profile: &crate::oauth::GoogleProfile,
) -> diesel::QueryResult<User> {
    let existing = users
        .filter(google_id.eq(&profile.google_id))
        .first::<User>(conn)
        .optional()?;

    if let Some(user) = existing {
        return Ok(user);
    }

    let new_user = NewUser {
        id: Uuid::new_v4().to_string(),
        google_id: profile.google_id.clone(),
        name: profile.name.clone(),
        avatar_url: profile.avatar_url.clone(),
        created_at: Utc::now().naive_utc(),
    };
    diesel::insert_into(users)
        .values(&new_user)
        .execute(conn)?;

    users
        .filter(google_id.eq(&profile.google_id))
        .first::<User>(conn)
}
