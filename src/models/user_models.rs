use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use diesel::prelude::{Insertable, Queryable};
use diesel::{AsChangeset, Selectable};

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub google_id: String,
    pub name: String,
    pub avatar_url: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub id: String,
    pub google_id: String,
    pub name: String,
    pub avatar_url: String,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub name: Option<String>,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
}

/// Owner info embedded in playlist responses.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            avatar_url: u.avatar_url,
        }
    }
}

/// Public profile page: user fields, public playlists and all favorites.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub created_at: NaiveDateTime,
    pub playlists: Vec<ProfilePlaylist>,
    pub favorite_songs: Vec<crate::models::favorite_models::FavoriteSongFullEntry>,
    pub favorite_albums: Vec<crate::models::favorite_models::FavoriteAlbumEntry>,
    pub favorite_artists: Vec<crate::models::favorite_models::FavoriteArtistEntry>,
}

/// Playlist as shown on a profile: no owner embed, song portraits only.
#[derive(Serialize)]
pub struct ProfilePlaylist {
    #[serde(flatten)]
    pub playlist: crate::models::playlist_models::Playlist,
    pub songs: Vec<crate::models::playlist_models::PlaylistSongThumb>,
}
