use actix_web::web;

use crate::handlers::song_handlers::list_songs_by_genre;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/songs").route("/{genre}", web::get().to(list_songs_by_genre)),
    );
}
