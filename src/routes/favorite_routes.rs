use actix_web::web;

use crate::handlers::favorite_handlers::{
    add_favorite_album, add_favorite_artist, add_favorite_song, list_favorites,
    remove_favorite_album, remove_favorite_artist, remove_favorite_song,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("/song", web::post().to(add_favorite_song))
            .route("/song", web::delete().to(remove_favorite_song))
            .route("/album", web::post().to(add_favorite_album))
            .route("/album", web::delete().to(remove_favorite_album))
            .route("/artist", web::post().to(add_favorite_artist))
            .route("/artist", web::delete().to(remove_favorite_artist)),
    );
}
