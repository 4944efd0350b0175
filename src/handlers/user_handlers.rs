use actix_web::web::ReqData;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use diesel::prelude::*;

use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::models::album_models::{Album, AlbumWithArtist};
use crate::models::artist_models::Artist;
use crate::models::favorite_models::{
    FavoriteAlbum, FavoriteAlbumEntry, FavoriteArtist, FavoriteArtistEntry, FavoriteSong,
    FavoriteSongFullEntry,
};
use crate::models::playlist_models::{Playlist, PlaylistSongThumb, SongThumb};
use crate::models::song_models::{Song, SongFull};
use crate::models::token_models::Claims;
use crate::models::user_models::{ProfilePlaylist, UpdateUser, User, UserProfile};
use crate::schema::{
    albums::dsl as albums_dsl, artists::dsl as artists_dsl,
    favorite_albums::dsl as fav_albums_dsl, favorite_artists::dsl as fav_artists_dsl,
    favorite_songs::dsl as fav_songs_dsl, playlist_songs::dsl as ps_dsl,
    playlists::dsl as playlists_dsl, songs::dsl as songs_dsl, users::dsl as users_dsl,
};
use crate::utils::auth_utils::{check_ownership, require_claims};
use crate::utils::token_utils::generate_jwt;

/// Public profile: user fields plus public playlists and favorites,
/// favorites newest-first.
pub async fn get_user(
    pool: web::Data<DbPool>,
    user_id_param: web::Path<String>,
) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let user = match users_dsl::users
        .find(user_id_param.into_inner())
        .first::<User>(&mut conn)
        .optional()
    {
        Ok(Some(u)) => u,
        Ok(None) => return HttpResponse::NotFound().body("Usuário não encontrado"),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let public_playlists = match playlists_dsl::playlists
        .filter(playlists_dsl::user_id.eq(&user.id))
        .filter(playlists_dsl::is_public.eq(true))
        .load::<Playlist>(&mut conn)
    {
        Ok(list) => list,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let mut playlists = Vec::with_capacity(public_playlists.len());
    for playlist in public_playlists {
        let thumbs: Vec<(String, i64)> = match ps_dsl::playlist_songs
            .inner_join(songs_dsl::songs)
            .filter(ps_dsl::playlist_id.eq(&playlist.id))
            .select((songs_dsl::portrait, songs_dsl::itunes_id))
            .load(&mut conn)
        {
            Ok(rows) => rows,
            Err(_) => return HttpResponse::InternalServerError().finish(),
        };
        playlists.push(ProfilePlaylist {
            playlist,
            songs: thumbs
                .into_iter()
                .map(|(portrait, itunes_id)| PlaylistSongThumb {
                    song: SongThumb { portrait, itunes_id },
                })
                .collect(),
        });
    }

    let favorite_songs: Vec<(FavoriteSong, (Song, Artist, Option<Album>))> =
        match fav_songs_dsl::favorite_songs
            .inner_join(
                songs_dsl::songs
                    .inner_join(artists_dsl::artists)
                    .left_join(albums_dsl::albums),
            )
            .filter(fav_songs_dsl::user_id.eq(&user.id))
            .order(fav_songs_dsl::favorited_at.desc())
            .select((
                FavoriteSong::as_select(),
                (
                    Song::as_select(),
                    Artist::as_select(),
                    Option::<Album>::as_select(),
                ),
            ))
            .load(&mut conn)
        {
            Ok(rows) => rows,
            Err(_) => return HttpResponse::InternalServerError().finish(),
        };

    let favorite_albums: Vec<(FavoriteAlbum, (Album, Artist))> =
        match fav_albums_dsl::favorite_albums
            .inner_join(albums_dsl::albums.inner_join(artists_dsl::artists))
            .filter(fav_albums_dsl::user_id.eq(&user.id))
            .order(fav_albums_dsl::favorited_at.desc())
            .select((
                FavoriteAlbum::as_select(),
                (Album::as_select(), Artist::as_select()),
            ))
            .load(&mut conn)
        {
            Ok(rows) => rows,
            Err(_) => return HttpResponse::InternalServerError().finish(),
        };

    let favorite_artists: Vec<(FavoriteArtist, Artist)> = match fav_artists_dsl::favorite_artists
        .inner_join(artists_dsl::artists)
        .filter(fav_artists_dsl::user_id.eq(&user.id))
        .order(fav_artists_dsl::favorited_at.desc())
        .select((FavoriteArtist::as_select(), Artist::as_select()))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let profile = UserProfile {
        id: user.id,
        name: user.name,
        avatar_url: user.avatar_url,
        created_at: user.created_at,
        playlists,
        favorite_songs: favorite_songs
            .into_iter()
            .map(|(edge, (song, artist, album))| FavoriteSongFullEntry {
                id: edge.id,
                favorited_at: edge.favorited_at,
                song: SongFull {
                    song,
                    artist,
                    album,
                },
            })
            .collect(),
        favorite_albums: favorite_albums
            .into_iter()
            .map(|(edge, (album, artist))| FavoriteAlbumEntry {
                id: edge.id,
                favorited_at: edge.favorited_at,
                album: AlbumWithArtist { album, artist },
            })
            .collect(),
        favorite_artists: favorite_artists
            .into_iter()
            .map(|(edge, artist)| FavoriteArtistEntry {
                id: edge.id,
                favorited_at: edge.favorited_at,
                artist,
            })
            .collect(),
    };

    HttpResponse::Ok().json(serde_json::json!({ "user": profile }))
}

/// Owner-only profile update; reissues the session token so the new name
/// and avatar land in the claims.
pub async fn update_user(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    user_id_param: web::Path<String>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<UpdateUser>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let user_id_param = user_id_param.into_inner();
    if let Err(resp) = check_ownership(&user_id_param, &claims) {
        return resp;
    }

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let user = match users_dsl::users
        .find(&user_id_param)
        .first::<User>(&mut conn)
        .optional()
    {
        Ok(Some(u)) => u,
        Ok(None) => return HttpResponse::NotFound().body("Usuário não encontrado"),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let payload = payload.into_inner();
    if payload.name.is_some() || payload.avatar_url.is_some() {
        // AsChangeset skips None fields; an empty changeset is not valid SQL
        if diesel::update(users_dsl::users.find(&user.id))
            .set(&payload)
            .execute(&mut conn)
            .is_err()
        {
            return HttpResponse::InternalServerError().body("Failed to update user");
        }
    }

    let updated = match users_dsl::users.find(&user.id).first::<User>(&mut conn) {
        Ok(u) => u,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let token = generate_jwt(&updated, &config.jwt_secret);
    HttpResponse::Ok().json(serde_json::json!({ "token": token }))
}
