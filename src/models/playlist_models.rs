use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use diesel::prelude::{Insertable, Queryable};
use diesel::Selectable;

use crate::models::song_models::SongWithRefs;
use crate::models::user_models::UserSummary;

// --------------------- Playlist Models ---------------------
#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::playlists)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub portrait: Option<String>,
    pub is_public: bool,
    pub is_fixed: bool,
    pub fixed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::playlists)]
pub struct NewPlaylist {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub is_public: bool,
    pub is_fixed: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub user_id: String,
    pub name: String,
    pub is_public: bool,
}

/// Partial update. `fixed_at` distinguishes "field absent" (keep current
/// value) from an explicit `null` (clear the pin timestamp).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub portrait: Option<String>,
    pub is_public: Option<bool>,
    pub is_fixed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub fixed_at: Option<Option<DateTime<Utc>>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// --------------------- Playlist Songs Models ---------------------
#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::playlist_songs)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSong {
    pub id: String,
    pub playlist_id: String,
    pub song_id: String,
    pub added_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::playlist_songs)]
pub struct NewPlaylistSong {
    pub id: String,
    pub playlist_id: String,
    pub song_id: String,
    pub added_at: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct AddSongRequest {
    #[serde(rename = "newSong")]
    pub new_song: crate::models::catalog_models::SongPayload,
}

#[derive(Deserialize)]
pub struct RemoveSongRequest {
    #[serde(rename = "songToRemove")]
    pub song_to_remove: SongToRemove,
}

#[derive(Deserialize)]
pub struct SongToRemove {
    pub id: String,
}

// --------------------- Response Models ---------------------

/// Listing item: playlist row plus owner summary and song thumbnails.
#[derive(Serialize)]
pub struct PlaylistSummary {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub user: UserSummary,
    pub songs: Vec<PlaylistSongThumb>,
}

#[derive(Serialize)]
pub struct PlaylistSongThumb {
    pub song: SongThumb,
}

#[derive(Serialize)]
pub struct SongThumb {
    pub portrait: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
}

/// Full playlist with joined song/artist/album data.
#[derive(Serialize)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub user: UserSummary,
    pub songs: Vec<PlaylistEntryDetail>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntryDetail {
    pub id: String,
    pub added_at: NaiveDateTime,
    pub song: SongWithRefs,
}
