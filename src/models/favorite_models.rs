use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use diesel::prelude::{Insertable, Queryable};
use diesel::Selectable;

use crate::models::album_models::AlbumWithArtist;
use crate::models::artist_models::Artist;
use crate::models::catalog_models::{
    AlbumFavoritePayload, ArtistFavoritePayload, ItunesRef, SongPayload,
};
use crate::models::song_models::{SongFull, SongWithArtist};

// --------------------- Favorite Edge Rows ---------------------
#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::favorite_songs)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSong {
    pub id: String,
    pub user_id: String,
    pub song_id: String,
    pub favorited_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorite_songs)]
pub struct NewFavoriteSong {
    pub id: String,
    pub user_id: String,
    pub song_id: String,
    pub favorited_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::favorite_albums)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteAlbum {
    pub id: String,
    pub user_id: String,
    pub album_id: String,
    pub favorited_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorite_albums)]
pub struct NewFavoriteAlbum {
    pub id: String,
    pub user_id: String,
    pub album_id: String,
    pub favorited_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::favorite_artists)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteArtist {
    pub id: String,
    pub user_id: String,
    pub artist_id: String,
    pub favorited_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorite_artists)]
pub struct NewFavoriteArtist {
    pub id: String,
    pub user_id: String,
    pub artist_id: String,
    pub favorited_at: NaiveDateTime,
}

// --------------------- Request Models ---------------------
#[derive(Deserialize)]
pub struct FavoriteSongRequest {
    #[serde(rename = "songToBeFavorited")]
    pub song_to_be_favorited: SongPayload,
}

#[derive(Deserialize)]
pub struct FavoriteAlbumRequest {
    #[serde(rename = "albumToBeFavorited")]
    pub album_to_be_favorited: AlbumFavoritePayload,
}

#[derive(Deserialize)]
pub struct FavoriteArtistRequest {
    #[serde(rename = "artistToBeFavorited")]
    pub artist_to_be_favorited: ArtistFavoritePayload,
}

#[derive(Deserialize)]
pub struct UnfavoriteSongRequest {
    #[serde(rename = "songToBeUnfavorited")]
    pub song_to_be_unfavorited: ItunesRef,
}

#[derive(Deserialize)]
pub struct UnfavoriteAlbumRequest {
    #[serde(rename = "albumToBeUnfavorited")]
    pub album_to_be_unfavorited: ItunesRef,
}

#[derive(Deserialize)]
pub struct UnfavoriteArtistRequest {
    #[serde(rename = "artistToBeUnfavorited")]
    pub artist_to_be_unfavorited: ItunesRef,
}

// --------------------- Response Models ---------------------
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSongEntry {
    pub id: String,
    pub favorited_at: NaiveDateTime,
    pub song: SongWithArtist,
}

/// Profile variant: song carries both artist and album.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSongFullEntry {
    pub id: String,
    pub favorited_at: NaiveDateTime,
    pub song: SongFull,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteAlbumEntry {
    pub id: String,
    pub favorited_at: NaiveDateTime,
    pub album: AlbumWithArtist,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteArtistEntry {
    pub id: String,
    pub favorited_at: NaiveDateTime,
    pub artist: Artist,
}
