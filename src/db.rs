use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use diesel::SqliteConnection;
use actix_web::{HttpResponse, ResponseError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations};
use std::fmt;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Custom error type for DB connection issues
#[derive(Debug)]
pub struct DbError;

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Database connection error")
    }
}

impl ResponseError for DbError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError().body("Database connection error")
    }
}

/// Helper function to get a pooled DB connection
pub fn get_conn(pool: &DbPool) -> Result<DbConn, DbError> {
    pool.get().map_err(|_| DbError)
}
