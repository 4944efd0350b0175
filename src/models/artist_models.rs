use chrono::NaiveDateTime;
use serde::Serialize;
use diesel::prelude::{Insertable, Queryable};
use diesel::Selectable;

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::artists)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
    pub name: String,
    #[serde(rename = "iTunesViewUrl")]
    pub itunes_view_url: String,
    pub genre: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::artists)]
pub struct NewArtist {
    pub id: String,
    pub itunes_id: i64,
    pub name: String,
    pub itunes_view_url: String,
    pub genre: String,
    pub created_at: NaiveDateTime,
}

/// Minimal artist embed for song detail responses.
#[derive(Serialize, Clone)]
pub struct ArtistRef {
    pub id: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
    pub name: String,
}

impl From<Artist> for ArtistRef {
    fn from(a: Artist) -> Self {
        Self {
            id: a.id,
            itunes_id: a.itunes_id,
            name: a.name,
        }
    }
}

/// Artist embed for the genre browse listing.
#[derive(Serialize, Clone)]
pub struct ArtistSummary {
    pub name: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
}

impl From<Artist> for ArtistSummary {
    fn from(a: Artist) -> Self {
        Self {
            name: a.name,
            itunes_id: a.itunes_id,
        }
    }
}
