use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user ID
    pub name: String,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
    pub exp: i64, // expiration timestamp
}
