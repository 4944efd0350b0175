use actix_web::web;

use crate::handlers::user_handlers::{get_user, update_user};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/{user_id}", web::get().to(get_user))
            .route("/{user_id}", web::put().to(update_user)),
    );
}
