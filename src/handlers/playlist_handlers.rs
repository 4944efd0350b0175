use std::cmp::Ordering;

use actix_web::web::ReqData;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::db::{get_conn, DbPool};
use crate::models::playlist_models::{
    AddSongRequest, CreatePlaylistRequest, NewPlaylist, NewPlaylistSong, Playlist,
    PlaylistDetail, PlaylistEntryDetail, PlaylistSong, PlaylistSongThumb, PlaylistSummary,
    RemoveSongRequest, SongThumb, UpdatePlaylistRequest,
};
use crate::models::song_models::{Song, SongWithRefs};
use crate::models::token_models::Claims;
use crate::models::user_models::User;
use crate::schema::{
    albums::dsl as albums_dsl, artists::dsl as artists_dsl,
    playlist_songs::dsl as ps_dsl, playlists::dsl as playlists_dsl, songs::dsl as songs_dsl,
    users::dsl as users_dsl,
};
use crate::utils::auth_utils::{check_ownership, require_claims};
use crate::utils::catalog_utils::upsert_song_graph;

/// Order for a user's own playlist listing: pinned playlists first, most
/// recently pinned leading; the rest newest-created first.
pub fn compare_playlists(a: &Playlist, b: &Playlist) -> Ordering {
    let a_fixed = a.is_fixed && a.fixed_at.is_some();
    let b_fixed = b.is_fixed && b.fixed_at.is_some();

    match (a_fixed, b_fixed) {
        (true, true) => b.fixed_at.cmp(&a.fixed_at),
        (false, false) => b.created_at.cmp(&a.created_at),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

fn playlist_summary(
    conn: &mut SqliteConnection,
    playlist: Playlist,
) -> QueryResult<PlaylistSummary> {
    let user: User = users_dsl::users.find(&playlist.user_id).first(conn)?;

    let thumbs: Vec<(String, i64)> = ps_dsl::playlist_songs
        .inner_join(songs_dsl::songs)
        .filter(ps_dsl::playlist_id.eq(&playlist.id))
        .select((songs_dsl::portrait, songs_dsl::itunes_id))
        .load(conn)?;

    Ok(PlaylistSummary {
        playlist,
        user: user.into(),
        songs: thumbs
            .into_iter()
            .map(|(portrait, itunes_id)| PlaylistSongThumb {
                song: SongThumb { portrait, itunes_id },
            })
            .collect(),
    })
}

fn playlist_detail(
    conn: &mut SqliteConnection,
    playlist: Playlist,
) -> QueryResult<PlaylistDetail> {
    let user: User = users_dsl::users.find(&playlist.user_id).first(conn)?;

    let entries: Vec<PlaylistSong> = ps_dsl::playlist_songs
        .filter(ps_dsl::playlist_id.eq(&playlist.id))
        .order(ps_dsl::added_at.asc())
        .select(PlaylistSong::as_select())
        .load(conn)?;

    let mut songs = Vec::with_capacity(entries.len());
    for entry in entries {
        let song: Song = songs_dsl::songs.find(&entry.song_id).first(conn)?;
        let artist = artists_dsl::artists
            .find(&song.artist_id)
            .first::<crate::models::artist_models::Artist>(conn)?;
        let album = match &song.album_id {
            Some(album_id_value) => albums_dsl::albums
                .find(album_id_value)
                .first::<crate::models::album_models::Album>(conn)
                .optional()?,
            None => None,
        };
        songs.push(PlaylistEntryDetail {
            id: entry.id,
            added_at: entry.added_at,
            song: SongWithRefs {
                song,
                artist: artist.into(),
                album: album.map(Into::into),
            },
        });
    }

    Ok(PlaylistDetail {
        playlist,
        user: user.into(),
        songs,
    })
}

// --------------------- Playlists ---------------------

/// Public playlists; with a valid bearer token the caller's own playlists
/// are included as well. An invalid token degrades to the public listing.
pub async fn list_playlists(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let result = match &claims {
        Some(c) => playlists_dsl::playlists
            .filter(playlists_dsl::is_public.eq(true).or(playlists_dsl::user_id.eq(&c.sub)))
            .order(playlists_dsl::created_at.asc())
            .load::<Playlist>(&mut conn),
        None => playlists_dsl::playlists
            .filter(playlists_dsl::is_public.eq(true))
            .order(playlists_dsl::created_at.asc())
            .load::<Playlist>(&mut conn),
    };

    let list = match result {
        Ok(list) => list,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let mut items = Vec::with_capacity(list.len());
    for playlist in list {
        match playlist_summary(&mut conn, playlist) {
            Ok(summary) => items.push(summary),
            Err(_) => return HttpResponse::InternalServerError().finish(),
        }
    }

    HttpResponse::Ok().json(serde_json::json!({ "playlists": items }))
}

pub async fn list_user_playlists(
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

    let mut list = match playlists_dsl::playlists
        .filter(playlists_dsl::user_id.eq(&claims.sub))
        .load::<Playlist>(&mut conn)
    {
        Ok(list) => list,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    list.sort_by(compare_playlists);

    let mut items = Vec::with_capacity(list.len());
    for playlist in list {
        match playlist_summary(&mut conn, playlist) {
            Ok(summary) => items.push(summary),
            Err(_) => return HttpResponse::InternalServerError().finish(),
        }
    }

    HttpResponse::Ok().json(serde_json::json!({ "playlists": items }))
}

pub async fn create_playlist(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<CreatePlaylistRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    if let Err(resp) = check_ownership(&payload.user_id, &claims) {
        return resp;
    }

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let new_playlist = NewPlaylist {
        id: Uuid::new_v4().to_string(),
        user_id: payload.user_id.clone(),
        name: payload.name.clone(),
        is_public: payload.is_public,
        is_fixed: false,
        created_at: Utc::now().naive_utc(),
    };

    let result = diesel::insert_into(playlists_dsl::playlists)
        .values(&new_playlist)
        .execute(&mut conn)
        .and_then(|_| {
            playlists_dsl::playlists
                .find(&new_playlist.id)
                .first::<Playlist>(&mut conn)
        });

    match result {
        Ok(playlist) => HttpResponse::Created().json(playlist),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

/// Public playlists are readable by anyone; private ones only by their
/// owner with a valid token.
pub async fn get_playlist(
    pool: web::Data<DbPool>,
    playlist_id_param: web::Path<String>,
    claims: Option<ReqData<Claims>>,
) -> impl Responder {
    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let playlist = match playlists_dsl::playlists
        .find(playlist_id_param.into_inner())
        .first::<Playlist>(&mut conn)
        .optional()
    {
        Ok(Some(p)) => p,
        Ok(None) => return HttpResponse::NotFound().body("Playlist não encontrada."),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    if !playlist.is_public {
        let owner_ok = claims
            .as_ref()
            .map(|c| c.sub == playlist.user_id)
            .unwrap_or(false);
        if !owner_ok {
            return HttpResponse::Forbidden().body("Acesso não permitido");
        }
    }

    match playlist_detail(&mut conn, playlist) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub async fn update_playlist(
    pool: web::Data<DbPool>,
    playlist_id_param: web::Path<String>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<UpdatePlaylistRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let playlist_id_param = playlist_id_param.into_inner();

    let playlist = match playlists_dsl::playlists
        .find(&playlist_id_param)
        .first::<Playlist>(&mut conn)
        .optional()
    {
        Ok(Some(p)) => p,
        Ok(None) => return HttpResponse::NotFound().body("Playlist não encontrada."),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    if claims.sub != playlist.user_id {
        return HttpResponse::Forbidden().body("Acesso não permitido");
    }

    let payload = payload.into_inner();
    let name = payload.name.unwrap_or(playlist.name);
    let description = payload.description.or(playlist.description);
    let portrait = payload.portrait.or(playlist.portrait);
    let is_public = payload.is_public.unwrap_or(playlist.is_public);
    let is_fixed = payload.is_fixed.unwrap_or(playlist.is_fixed);
    let fixed_at = match payload.fixed_at {
        Some(Some(ts)) => Some(ts.naive_utc()),
        Some(None) => None,
        None => playlist.fixed_at,
    };

    let result = diesel::update(playlists_dsl::playlists.find(&playlist.id))
        .set((
            playlists_dsl::name.eq(name),
            playlists_dsl::description.eq(description),
            playlists_dsl::portrait.eq(portrait),
            playlists_dsl::is_public.eq(is_public),
            playlists_dsl::is_fixed.eq(is_fixed),
            playlists_dsl::fixed_at.eq(fixed_at),
        ))
        .execute(&mut conn)
        .and_then(|_| {
            playlists_dsl::playlists
                .find(&playlist.id)
                .first::<Playlist>(&mut conn)
        });

    match result {
        Ok(updated) => HttpResponse::Ok().json(serde_json::json!({ "playlist": updated })),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

/// Removes the playlist and every song-membership row it owns.
pub async fn delete_playlist(
    pool: web::Data<DbPool>,
    playlist_id_param: web::Path<String>,
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

    let playlist_id_param = playlist_id_param.into_inner();

    let playlist = match playlists_dsl::playlists
        .find(&playlist_id_param)
        .filter(playlists_dsl::user_id.eq(&claims.sub))
        .first::<Playlist>(&mut conn)
        .optional()
    {
        Ok(Some(p)) => p,
        Ok(None) => return HttpResponse::NotFound().body("Not found or unauthorized user"),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let deleted_songs = match diesel::delete(
        ps_dsl::playlist_songs.filter(ps_dsl::playlist_id.eq(&playlist.id)),
    )
    .execute(&mut conn)
    {
        Ok(count) => count,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    match diesel::delete(playlists_dsl::playlists.find(&playlist.id)).execute(&mut conn) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "deletedPlaylist": playlist,
            "deletedSongs": deleted_songs,
        })),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

// --------------------- Songs in Playlist ---------------------

/// Runs the catalog cascade for the submitted song, then links it into the
/// playlist. The same song may be added more than once.
pub async fn add_song_to_playlist(
    pool: web::Data<DbPool>,
    playlist_id_param: web::Path<String>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<AddSongRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let playlist_id_param = playlist_id_param.into_inner();

    let playlist = match playlists_dsl::playlists
        .find(&playlist_id_param)
        .first::<Playlist>(&mut conn)
        .optional()
    {
        Ok(Some(p)) => p,
        Ok(None) => return HttpResponse::NotFound().body("Playlist não encontrada."),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    if claims.sub != playlist.user_id {
        return HttpResponse::Forbidden().body("Acesso não permitido");
    }

    let song = match upsert_song_graph(&mut conn, &payload.new_song) {
        Ok(song) => song,
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    let entry = NewPlaylistSong {
        id: Uuid::new_v4().to_string(),
        playlist_id: playlist.id.clone(),
        song_id: song.id.clone(),
        added_at: Utc::now().naive_utc(),
    };

    let result = diesel::insert_into(ps_dsl::playlist_songs)
        .values(&entry)
        .execute(&mut conn)
        .and_then(|_| {
            ps_dsl::playlist_songs
                .find(&entry.id)
                .select(PlaylistSong::as_select())
                .first::<PlaylistSong>(&mut conn)
        });

    match result {
        Ok(added) => HttpResponse::Created().json(serde_json::json!({ "addedSong": added })),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub async fn remove_song_from_playlist(
    pool: web::Data<DbPool>,
    playlist_id_param: web::Path<String>,
    claims: Option<ReqData<Claims>>,
    payload: web::Json<RemoveSongRequest>,
) -> impl Responder {
    let claims = match require_claims(claims) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut conn = match get_conn(&pool) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let playlist_id_param = playlist_id_param.into_inner();

    let entry = match ps_dsl::playlist_songs
        .inner_join(playlists_dsl::playlists)
        .filter(ps_dsl::id.eq(&payload.song_to_remove.id))
        .filter(ps_dsl::playlist_id.eq(&playlist_id_param))
        .filter(playlists_dsl::user_id.eq(&claims.sub))
        .select(PlaylistSong::as_select())
        .first::<PlaylistSong>(&mut conn)
        .optional()
    {
        Ok(Some(entry)) => entry,
        Ok(None) => return HttpResponse::NotFound().body("Música não encontrada."),
        Err(_) => return HttpResponse::InternalServerError().finish(),
    };

    match diesel::delete(ps_dsl::playlist_songs.find(&entry.id)).execute(&mut conn) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "removedSong": entry })),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn playlist(name: &str, created_day: u32, fixed_day: Option<u32>) -> Playlist {
        Playlist {
            id: name.to_string(),
            user_id: "u-1".to_string(),
            name: name.to_string(),
            description: None,
            portrait: None,
            is_public: false,
            is_fixed: fixed_day.is_some(),
            fixed_at: fixed_day.map(|d| {
                NaiveDate::from_ymd_opt(2024, 3, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
            created_at: NaiveDate::from_ymd_opt(2024, 1, created_day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn fixed_playlists_sort_before_unfixed() {
        let mut list = vec![
            playlist("old-unfixed", 1, None),
            playlist("fixed", 2, Some(1)),
            playlist("new-unfixed", 3, None),
        ];
        list.sort_by(compare_playlists);

        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["fixed", "new-unfixed", "old-unfixed"]);
    }

    #[test]
    fn fixed_playlists_sort_by_most_recent_pin() {
        let mut list = vec![
            playlist("pinned-early", 1, Some(5)),
            playlist("pinned-late", 2, Some(20)),
        ];
        list.sort_by(compare_playlists);

        assert_eq!(list[0].name, "pinned-late");
        assert_eq!(list[1].name, "pinned-early");
    }

    #[test]
    fn fixed_flag_without_timestamp_sorts_as_unfixed() {
        let mut flagged = playlist("flag-only", 5, None);
        flagged.is_fixed = true;
        let mut list = vec![flagged, playlist("pinned", 1, Some(1))];
        list.sort_by(compare_playlists);

        assert_eq!(list[0].name, "pinned");
        assert_eq!(list[1].name, "flag-only");
    }

    #[test]
    fn unfixed_playlists_sort_newest_first() {
        let mut list = vec![
            playlist("a", 1, None),
            playlist("c", 20, None),
            playlist("b", 10, None),
        ];
        list.sort_by(compare_playlists);

        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }
}
