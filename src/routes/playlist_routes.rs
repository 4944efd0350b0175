use actix_web::web;

use crate::handlers::playlist_handlers::{
    add_song_to_playlist, create_playlist, delete_playlist, get_playlist, list_playlists,
    list_user_playlists, remove_song_from_playlist, update_playlist,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/playlists")
            .route("", web::get().to(list_playlists))
            .route("", web::post().to(create_playlist))
            // must come before the id match
            .route("/user", web::get().to(list_user_playlists))
            .route("/{playlist_id}", web::get().to(get_playlist))
            .route("/{playlist_id}", web::put().to(update_playlist))
            .route("/{playlist_id}", web::delete().to(delete_playlist))
            .route("/{playlist_id}/songs", web::post().to(add_song_to_playlist))
            .route("/{playlist_id}/songs", web::delete().to(remove_song_from_playlist)),
    );
}
