use actix_web::{web, HttpResponse, Responder, ResponseError};
use diesel::prelude::*;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::db::{get_conn, DbPool};
use crate::models::album_models::Album;
use crate::models::artist_models::Artist;
use crate::models::song_models::{AlbumItunesRef, GenreSong, Song};
use crate::schema::{
    albums::dsl as albums_dsl, artists::dsl as artists_dsl, songs::dsl as songs_dsl,
};

#[derive(Deserialize)]
pub struct GenreQuery {
    pub limit: Option<usize>,
}

/// Shuffle the catalog slice and optionally truncate it. The subset is
/// random; callers must not rely on ordering.
pub fn sample_songs<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    items.shuffle(&mut rand::rng());
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

pub async fn list_songs_by_genre(
    pool: web::Data<DbPool>,
    genre_param: web::Path<String>,
    query: web::Query<GenreQuery>,
) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let genre_param = genre_param.into_inner();

    let rows: Vec<(Song, Artist, Option<Album>)> = match songs_dsl::songs
        .inner_join(artists_dsl::artists)
        .left_join(albums_dsl::albums)
        .filter(songs_dsl::genre.eq(&genre_param))
        .select((
            Song::as_select(),
            Artist::as_select(),
            Option::<Album>::as_select(),
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let songs: Vec<GenreSong> = rows
        .into_iter()
        .map(|(song, artist, album)| GenreSong {
            song,
            artist: artist.into(),
            album: album.map(|a| AlbumItunesRef {
                itunes_id: a.itunes_id,
            }),
        })
        .collect();

    let songs = sample_songs(songs, query.limit);

    HttpResponse::Ok().json(serde_json::json!({ "songs": songs }))
}
