use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::models::album_models::{Album, NewAlbum};
use crate::models::artist_models::{Artist, NewArtist};
use crate::models::catalog_models::{AlbumPayload, ArtistPayload, SongPayload, TrackPayload};
use crate::models::song_models::{NewSong, Song};
use crate::schema::{albums, artists, songs};

// Catalog rows are keyed by the external catalog id. Each upsert is a single
// INSERT .. ON CONFLICT DO UPDATE so two requests submitting the same id
// cannot race a separate existence check; the unique index is the source of
// truth for "already exists". Row ids are stable across re-submissions.

pub fn upsert_artist(
    conn: &mut SqliteConnection,
    payload: &ArtistPayload,
) -> QueryResult<Artist> {
    diesel::insert_into(artists::table)
        .values(NewArtist {
            id: Uuid::new_v4().to_string(),
            itunes_id: payload.itunes_id,
            name: payload.name.clone(),
            itunes_view_url: payload.itunes_view_url.clone(),
            genre: payload.genre.clone(),
            created_at: Utc::now().naive_utc(),
        })
        .on_conflict(artists::itunes_id)
        .do_update()
        .set((
            artists::name.eq(&payload.name),
            artists::itunes_view_url.eq(&payload.itunes_view_url),
            artists::genre.eq(&payload.genre),
        ))
        .execute(conn)?;

    artists::table
        .filter(artists::itunes_id.eq(payload.itunes_id))
        .first(conn)
}

/// The artist row must already exist; an album always hangs off one.
pub fn upsert_album(
    conn: &mut SqliteConnection,
    payload: &AlbumPayload,
    artist_id: &str,
) -> QueryResult<Album> {
    diesel::insert_into(albums::table)
        .values(NewAlbum {
            id: Uuid::new_v4().to_string(),
            itunes_id: payload.itunes_id,
            name: payload.name.clone(),
            portrait: payload.portrait.clone(),
            itunes_view_url: payload.itunes_view_url.clone(),
            genre: payload.genre.clone(),
            release_date: payload.release_date.clone(),
            artist_id: artist_id.to_string(),
            created_at: Utc::now().naive_utc(),
        })
        .on_conflict(albums::itunes_id)
        .do_update()
        .set((
            albums::name.eq(&payload.name),
            albums::portrait.eq(&payload.portrait),
            albums::itunes_view_url.eq(&payload.itunes_view_url),
            albums::genre.eq(&payload.genre),
            albums::release_date.eq(&payload.release_date),
            albums::artist_id.eq(artist_id),
        ))
        .execute(conn)?;

    albums::table
        .filter(albums::itunes_id.eq(payload.itunes_id))
        .first(conn)
}

pub fn upsert_song(
    conn: &mut SqliteConnection,
    payload: &TrackPayload,
    artist_id: &str,
    album_id: Option<&str>,
) -> QueryResult<Song> {
    diesel::insert_into(songs::table)
        .values(NewSong {
            id: Uuid::new_v4().to_string(),
            itunes_id: payload.itunes_id,
            name: payload.name.clone(),
            portrait: payload.portrait.clone(),
            itunes_view_url: payload.itunes_view_url.clone(),
            preview_url: payload.preview_url.clone(),
            release_date: payload.release_date.clone(),
            duration_seconds: payload.duration_seconds,
            genre: payload.genre.clone(),
            artist_id: artist_id.to_string(),
            album_id: album_id.map(|id| id.to_string()),
            created_at: Utc::now().naive_utc(),
        })
        .on_conflict(songs::itunes_id)
        .do_update()
        .set((
            songs::name.eq(&payload.name),
            songs::portrait.eq(&payload.portrait),
            songs::itunes_view_url.eq(&payload.itunes_view_url),
            songs::preview_url.eq(&payload.preview_url),
            songs::release_date.eq(&payload.release_date),
            songs::duration_seconds.eq(payload.duration_seconds),
            songs::genre.eq(&payload.genre),
            songs::artist_id.eq(artist_id),
            songs::album_id.eq(album_id.map(|id| id.to_string())),
        ))
        .execute(conn)?;

    songs::table
        .filter(songs::itunes_id.eq(payload.itunes_id))
        .first(conn)
}

/// Full cascade for a submitted song: artist, then its album, then the song
/// itself. Ordering matters, each level references the previous one.
pub fn upsert_song_graph(
    conn: &mut SqliteConnection,
    payload: &SongPayload,
) -> QueryResult<Song> {
    let artist = upsert_artist(conn, &payload.artist)?;
    let album = upsert_album(conn, &payload.album, &artist.id)?;
    upsert_song(conn, &payload.track, &artist.id, Some(&album.id))
}
