use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::models::token_models::Claims;
use crate::models::user_models::User;

pub fn generate_jwt(user: &User, secret: &[u8]) -> String {
    let expiration = Utc::now() + Duration::hours(720); // 30 days
    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        avatar_url: user.avatar_url.clone(),
        exp: expiration.timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
}

pub fn verify_jwt(token: &str, secret: &[u8]) -> Option<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret), &Validation::default())
        .ok()
        .map(|data| data.claims)
}
