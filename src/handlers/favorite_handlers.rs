use actix_web::web::ReqData;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::{get_conn, DbPool};
use crate::models::album_models::{Album, AlbumWithArtist};
use crate::models::artist_models::Artist;
use crate::models::favorite_models::{
    FavoriteAlbum, FavoriteAlbumEntry, FavoriteAlbumRequest, FavoriteArtist,
    FavoriteArtistEntry, FavoriteArtistRequest, FavoriteSong, FavoriteSongEntry,
    FavoriteSongRequest, NewFavoriteAlbum, NewFavoriteArtist, NewFavoriteSong,
    UnfavoriteAlbumRequest, UnfavoriteArtistRequest, UnfavoriteSongRequest,
};
use crate::models::song_models::{Song, SongWithArtist};
use crate::models::token_models::Claims;
use crate::schema::{
    albums::dsl as albums_dsl, artists::dsl as artists_dsl,
    favorite_albums::dsl as fav_albums_dsl, favorite_artists::dsl as fav_artists_dsl,
    favorite_songs::dsl as fav_songs_dsl, songs::dsl as songs_dsl,
};
use crate::utils::auth_utils::require_claims;
use crate::utils::catalog_utils::{upsert_album, upsert_artist, upsert_song, upsert_song_graph};

pub async fn list_favorites(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let songs: Vec<(FavoriteSong, (Song, Artist))> = match fav_songs_dsl::favorite_songs
        .inner_join(songs_dsl::songs.inner_join(artists_dsl::artists))
        .filter(fav_songs_dsl::user_id.eq(&claims.sub))
        .select((
            FavoriteSong::as_select(),
            (Song::as_select(), Artist::as_select()),
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let albums: Vec<(FavoriteAlbum, (Album, Artist))> = match fav_albums_dsl::favorite_albums
        .inner_join(albums_dsl::albums.inner_join(artists_dsl::artists))
        .filter(fav_albums_dsl::user_id.eq(&claims.sub))
        .select((
            FavoriteAlbum::as_select(),
            (Album::as_select(), Artist::as_select()),
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let artists: Vec<(FavoriteArtist, Artist)> = match fav_artists_dsl::favorite_artists
        .inner_join(artists_dsl::artists)
        .filter(fav_artists_dsl::user_id.eq(&claims.sub))
        .select((FavoriteArtist::as_select(), Artist::as_select()))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let favorite_songs: Vec<FavoriteSongEntry> = songs
        .into_iter()
        .map(|(edge, (song, artist))| FavoriteSongEntry {
            id: edge.id,
            favorited_at: edge.favorited_at,
            song: SongWithArtist { song, artist },
        })
        .collect();
    let favorite_albums: Vec<FavoriteAlbumEntry> = albums
        .into_iter()
        .map(|(edge, (album, artist))| FavoriteAlbumEntry {
            id: edge.id,
            favorited_at: edge.favorited_at,
            album: AlbumWithArtist { album, artist },
        })
        .collect();
    let favorite_artists: Vec<FavoriteArtistEntry> = artists
        .into_iter()
        .map(|(edge, artist)| FavoriteArtistEntry {
            id: edge.id,
            favorited_at: edge.favorited_at,
            artist,
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "favoriteSongs": favorite_songs,
        "favoriteAlbums": favorite_albums,
        "favoriteArtists": favorite_artists,
    }))
}

// --------------------- Favorite Songs ---------------------

pub async fn add_favorite_song(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<FavoriteSongRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let song = match upsert_song_graph(&mut conn, &payload.song_to_be_favorited) {
        Ok(song) => song,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let edge = NewFavoriteSong {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        song_id: song.id,
        favorited_at: Utc::now().naive_utc(),
    };

    let result = diesel::insert_into(fav_songs_dsl::favorite_songs)
        .values(&edge)
        .execute(&mut conn);

    match result {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "favoritedSong": FavoriteSong {
                id: edge.id,
                user_id: edge.user_id,
                song_id: edge.song_id,
                favorited_at: edge.favorited_at,
            }
        })),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            HttpResponse::Conflict().body("Música já está nos favoritos.")
        }
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub async fn remove_favorite_song(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<UnfavoriteSongRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let edge = match fav_songs_dsl::favorite_songs
        .inner_join(songs_dsl::songs)
        .filter(songs_dsl::itunes_id.eq(payload.song_to_be_unfavorited.itunes_id))
        .filter(fav_songs_dsl::user_id.eq(&claims.sub))
        .select(FavoriteSong::as_select())
        .first::<FavoriteSong>(&mut conn)
        .optional()
    {
        Ok(Some(edge)) => edge,
        Ok(None) => return HttpResponse::NotFound().body("Música não encontrada."),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    match diesel::delete(fav_songs_dsl::favorite_songs.find(&edge.id)).execute(&mut conn) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "unfavoritedSong": edge })),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

// --------------------- Favorite Albums ---------------------

/// Favoriting an album also upserts its full track list.
pub async fn add_favorite_album(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<FavoriteAlbumRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let data = &payload.album_to_be_favorited;

    let album = match upsert_artist(&mut conn, &data.artist)
        .and_then(|artist| upsert_album(&mut conn, &data.album, &artist.id))
    {
        Ok(album) => album,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    for track in &data.songs {
        if upsert_song(&mut conn, track, &album.artist_id, Some(&album.id)).is_err() {
            return HttpResponse::InternalServerError().finish();
        }
    }

    let edge = NewFavoriteAlbum {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        album_id: album.id,
        favorited_at: Utc::now().naive_utc(),
    };

    let result = diesel::insert_into(fav_albums_dsl::favorite_albums)
        .values(&edge)
        .execute(&mut conn);

    match result {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "favoritedAlbum": FavoriteAlbum {
                id: edge.id,
                user_id: edge.user_id,
                album_id: edge.album_id,
                favorited_at: edge.favorited_at,
            }
        })),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            HttpResponse::Conflict().body("Álbum já está nos favoritos.")
        }
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub async fn remove_favorite_album(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<UnfavoriteAlbumRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let edge = match fav_albums_dsl::favorite_albums
        .inner_join(albums_dsl::albums)
        .filter(albums_dsl::itunes_id.eq(payload.album_to_be_unfavorited.itunes_id))
        .filter(fav_albums_dsl::user_id.eq(&claims.sub))
        .select(FavoriteAlbum::as_select())
        .first::<FavoriteAlbum>(&mut conn)
        .optional()
    {
        Ok(Some(edge)) => edge,
        Ok(None) => return HttpResponse::NotFound().body("Álbum não encontrado."),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    match diesel::delete(fav_albums_dsl::favorite_albums.find(&edge.id)).execute(&mut conn) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "unfavoritedAlbum": edge })),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

// --------------------- Favorite Artists ---------------------

/// Favoriting an artist upserts their albums and songs as well; each song
/// carries its own album, which may not be in the submitted album list.
pub async fn add_favorite_artist(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<FavoriteArtistRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let data = &payload.artist_to_be_favorited;

    let artist = match upsert_artist(&mut conn, &data.artist) {
        Ok(artist) => artist,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    for album in &data.albums {
        if upsert_album(&mut conn, album, &artist.id).is_err() {
            return HttpResponse::InternalServerError().finish();
        }
    }

    for song in &data.songs {
        let album = match upsert_album(&mut conn, &song.album, &artist.id) {
            Ok(album) => album,
            Err(_) => return HttpResponse::InternalServerError().finish(),
        };
        if upsert_song(&mut conn, &song.track, &artist.id, Some(&album.id)).is_err() {
            return HttpResponse::InternalServerError().finish();
        }
    }

    let edge = NewFavoriteArtist {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        artist_id: artist.id,
        favorited_at: Utc::now().naive_utc(),
    };

    let result = diesel::insert_into(fav_artists_dsl::favorite_artists)
        .values(&edge)
        .execute(&mut conn);

    match result {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "favoritedArtist": FavoriteArtist {
                id: edge.id,
                user_id: edge.user_id,
                artist_id: edge.artist_id,
                favorited_at: edge.favorited_at,
            }
        })),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            HttpResponse::Conflict().body("Artista já está nos favoritos.")
        }
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub async fn remove_favorite_artist(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<UnfavoriteArtistRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let edge = match fav_artists_dsl::favorite_artists
        .inner_join(artists_dsl::artists)
        .filter(artists_dsl::itunes_id.eq(payload.artist_to_be_unfavorited.itunes_id))
        .filter(fav_artists_dsl::user_id.eq(&claims.sub))
        .select(FavoriteArtist::as_select())
        .first::<FavoriteArtist>(&mut conn)
        .optional()
    {
        Ok(Some(edge)) => edge,
        Ok(None) => return HttpResponse::NotFound().body("Artista não encontrado."),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    match diesel::delete(fav_artists_dsl::favorite_artists.find(&edge.id)).execute(&mut conn) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "unfavoritedArtist": edge })),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}
