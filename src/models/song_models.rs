use chrono::NaiveDateTime;
use serde::Serialize;
use diesel::prelude::{Insertable, Queryable};
use diesel::Selectable;

use crate::models::album_models::{Album, AlbumRef};
use crate::models::artist_models::{Artist, ArtistRef, ArtistSummary};

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::songs)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
    pub name: String,
    pub portrait: String,
    #[serde(rename = "iTunesViewUrl")]
    pub itunes_view_url: String,
    pub preview_url: String,
    pub release_date: String,
    #[serde(rename = "durationInSeconds")]
    pub duration_seconds: i32,
    pub genre: String,
    pub artist_id: String,
    pub album_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::songs)]
pub struct NewSong {
    pub id: String,
    pub itunes_id: i64,
    pub name: String,
    pub portrait: String,
    pub itunes_view_url: String,
    pub preview_url: String,
    pub release_date: String,
    pub duration_seconds: i32,
    pub genre: String,
    pub artist_id: String,
    pub album_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Song with its artist joined in, as returned by the favorites listing.
#[derive(Serialize)]
pub struct SongWithArtist {
    #[serde(flatten)]
    pub song: Song,
    pub artist: Artist,
}

/// Song with full artist and album rows, as returned by the profile page.
#[derive(Serialize)]
pub struct SongFull {
    #[serde(flatten)]
    pub song: Song,
    pub artist: Artist,
    pub album: Option<Album>,
}

/// Song with minimal artist/album refs, as returned inside playlist detail.
#[derive(Serialize)]
pub struct SongWithRefs {
    #[serde(flatten)]
    pub song: Song,
    pub artist: ArtistRef,
    pub album: Option<AlbumRef>,
}

/// Genre browse listing item.
#[derive(Serialize)]
pub struct GenreSong {
    #[serde(flatten)]
    pub song: Song,
    pub artist: ArtistSummary,
    pub album: Option<AlbumItunesRef>,
}

#[derive(Serialize, Clone)]
pub struct AlbumItunesRef {
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
}
