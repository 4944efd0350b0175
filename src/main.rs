use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpRequest, HttpServer, Responder};
use diesel::r2d2::{self, ConnectionManager};
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;

use encore_server::config::Config;
use encore_server::db::MIGRATIONS;
use encore_server::middleware::jwt_middleware::JwtAuth;
use encore_server::oauth::GoogleOAuth;
use encore_server::routes;

#[actix_web::get("/")]
async fn index(_req: HttpRequest) -> impl Responder {
    format!("Welcome!")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    log::info!("Starting server on port {}", config.port);

    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let pool = r2d2::Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool");

    {
        let mut conn = pool.get().expect("Failed to check out a connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
    }

    let oauth = web::Data::new(GoogleOAuth::new(&config));
    let config_data = web::Data::new(config.clone());
    let port = config.port;

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(config_data.clone())
            .app_data(oauth.clone())
            .wrap(JwtAuth::new(config.jwt_secret.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(index)
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
