use actix_web::web;

use crate::handlers::auth_handlers::register;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register));
}
