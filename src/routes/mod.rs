pub mod auth_routes;
pub mod favorite_routes;
pub mod playlist_routes;
pub mod song_routes;
pub mod user_routes;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    auth_routes::configure(cfg);
    playlist_routes::configure(cfg);
    favorite_routes::configure(cfg);
    song_routes::configure(cfg);
    user_routes::configure(cfg);
}
