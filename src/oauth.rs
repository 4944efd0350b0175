use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const PROFILE_URL: &str = "https://people.googleapis.com/v1/people/me";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("request to identity provider failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity provider returned status {0}")]
    Status(StatusCode),
    #[error("identity provider returned a profile without {0}")]
    MissingProfileField(&'static str),
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct PersonResponse {
    metadata: PersonMetadata,
    #[serde(default)]
    names: Vec<PersonName>,
    #[serde(default)]
    photos: Vec<PersonPhoto>,
}

#[derive(Deserialize)]
struct PersonMetadata {
    #[serde(default)]
    sources: Vec<PersonSource>,
}

#[derive(Deserialize)]
struct PersonSource {
    id: String,
}

#[derive(Deserialize)]
struct PersonName {
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Deserialize)]
struct PersonPhoto {
    url: String,
}

/// Identity fields extracted from the provider's profile document.
pub struct GoogleProfile {
    pub google_id: String,
    pub name: String,
    pub avatar_url: String,
}

/// Google OAuth client for the authorization-code registration flow.
pub struct GoogleOAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    http: reqwest::Client,
}

impl GoogleOAuth {
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri.clone(),
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OAuthError::Status(response.status()));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Fetch the user's profile from the People API.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, OAuthError> {
        let response = self
            .http
            .get(PROFILE_URL)
            .query(&[("personFields", "names,photos,metadata")])
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OAuthError::Status(response.status()));
        }

        let person: PersonResponse = response.json().await?;
        profile_from(person)
    }
}

fn profile_from(person: PersonResponse) -> Result<GoogleProfile, OAuthError> {
    let google_id = person
        .metadata
        .sources
        .first()
        .map(|s| s.id.clone())
        .ok_or(OAuthError::MissingProfileField("metadata source"))?;
    let name = person
        .names
        .first()
        .map(|n| n.display_name.clone())
        .ok_or(OAuthError::MissingProfileField("display name"))?;
    let avatar_url = person
        .photos
        .first()
        .map(|p| p.url.clone())
        .ok_or(OAuthError::MissingProfileField("photo"))?;

    Ok(GoogleProfile {
        google_id,
        name,
        avatar_url,
    })
}
