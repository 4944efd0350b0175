use chrono::NaiveDateTime;
use serde::Serialize;
use diesel::prelude::{Insertable, Queryable};
use diesel::Selectable;

use crate::models::artist_models::Artist;

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::albums)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
    pub name: String,
    pub portrait: String,
    #[serde(rename = "iTunesViewUrl")]
    pub itunes_view_url: String,
    pub genre: String,
    pub release_date: String,
    pub artist_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::albums)]
pub struct NewAlbum {
    pub id: String,
    pub itunes_id: i64,
    pub name: String,
    pub portrait: String,
    pub itunes_view_url: String,
    pub genre: String,
    pub release_date: String,
    pub artist_id: String,
    pub created_at: NaiveDateTime,
}

/// Minimal album embed for song detail responses.
#[derive(Serialize, Clone)]
pub struct AlbumRef {
    pub id: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
    pub name: String,
}

impl From<Album> for AlbumRef {
    fn from(a: Album) -> Self {
        Self {
            id: a.id,
            itunes_id: a.itunes_id,
            name: a.name,
        }
    }
}

#[derive(Serialize)]
pub struct AlbumWithArtist {
    #[serde(flatten)]
    pub album: Album,
    pub artist: Artist,
}
