use actix_web::{test, web, App};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;
use serde_json::{json, Value};
use uuid::Uuid;

use encore_server::config::Config;
use encore_server::db::{DbPool, MIGRATIONS};
use encore_server::middleware::jwt_middleware::JwtAuth;
use encore_server::models::catalog_models::{ArtistPayload, TrackPayload};
use encore_server::models::playlist_models::{NewPlaylist, NewPlaylistSong, Playlist};
use encore_server::models::user_models::{NewUser, User};
use encore_server::oauth::GoogleOAuth;
use encore_server::routes;
use encore_server::schema::{albums, artists, favorite_songs, playlist_songs, playlists, songs};
use encore_server::utils::catalog_utils::{upsert_artist, upsert_song, upsert_song_graph};
use encore_server::utils::token_utils::{generate_jwt, verify_jwt};

fn test_config() -> Config {
    Config {
        port: 0,
        database_url: String::new(),
        jwt_secret: b"test-secret".to_vec(),
        google_client_id: "client-id".to_string(),
        google_client_secret: "client-secret".to_string(),
        google_redirect_uri: "http://localhost:3000/api/auth/callback".to_string(),
    }
}

fn test_pool() -> (DbPool, tempfile::NamedTempFile) {
    let db_file = tempfile::NamedTempFile::new().unwrap();
    let manager =
        ConnectionManager::<SqliteConnection>::new(db_file.path().to_str().unwrap());
    let pool = r2d2::Pool::builder().max_size(2).build(manager).unwrap();
    pool.get()
        .unwrap()
        .run_pending_migrations(MIGRATIONS)
        .unwrap();
    (pool, db_file)
}

macro_rules! test_app {
    ($pool:expr, $config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new($config.clone()))
                .app_data(web::Data::new(GoogleOAuth::new(&$config)))
                .wrap(JwtAuth::new($config.jwt_secret.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn seed_user(pool: &DbPool, name: &str) -> User {
    let mut conn = pool.get().unwrap();
    let new_user = NewUser {
        id: Uuid::new_v4().to_string(),
        google_id: format!("google-{name}"),
        name: name.to_string(),
        avatar_url: format!("https://img.example/{name}.png"),
        created_at: day(1),
    };
    diesel::insert_into(encore_server::schema::users::table)
        .values(&new_user)
        .execute(&mut conn)
        .unwrap();
    encore_server::schema::users::table
        .find(&new_user.id)
        .first(&mut conn)
        .unwrap()
}

fn seed_playlist(pool: &DbPool, user: &User, name: &str, is_public: bool) -> Playlist {
    seed_playlist_at(pool, user, name, is_public, day(2), None)
}

fn seed_playlist_at(
    pool: &DbPool,
    user: &User,
    name: &str,
    is_public: bool,
    created_at: NaiveDateTime,
    fixed_at: Option<NaiveDateTime>,
) -> Playlist {
    let mut conn = pool.get().unwrap();
    let new_playlist = NewPlaylist {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        name: name.to_string(),
        is_public,
        is_fixed: fixed_at.is_some(),
        created_at,
    };
    diesel::insert_into(playlists::table)
        .values(&new_playlist)
        .execute(&mut conn)
        .unwrap();
    if let Some(ts) = fixed_at {
        diesel::update(playlists::table.find(&new_playlist.id))
            .set(playlists::fixed_at.eq(Some(ts)))
            .execute(&mut conn)
            .unwrap();
    }
    playlists::table
        .find(&new_playlist.id)
        .first(&mut conn)
        .unwrap()
}

fn seed_genre_song(pool: &DbPool, itunes_id: i64, genre: &str) {
    let mut conn = pool.get().unwrap();
    let artist = upsert_artist(
        &mut conn,
        &ArtistPayload {
            name: format!("artist-{itunes_id}"),
            itunes_id: 900_000 + itunes_id,
            itunes_view_url: format!("https://music.example/artist/{itunes_id}"),
            genre: genre.to_string(),
        },
    )
    .unwrap();
    upsert_song(
        &mut conn,
        &TrackPayload {
            name: format!("song-{itunes_id}"),
            portrait: format!("https://img.example/{itunes_id}.jpg"),
            itunes_id,
            itunes_view_url: format!("https://music.example/song/{itunes_id}"),
            preview_url: format!("https://audio.example/{itunes_id}.m4a"),
            release_date: "2020-01-01".to_string(),
            duration_seconds: 180,
            genre: genre.to_string(),
        },
        &artist.id,
        None,
    )
    .unwrap();
}

fn song_payload_json(itunes_id: i64) -> Value {
    json!({
        "name": format!("song-{itunes_id}"),
        "portrait": format!("https://img.example/{itunes_id}.jpg"),
        "iTunesId": itunes_id,
        "iTunesViewUrl": format!("https://music.example/song/{itunes_id}"),
        "previewUrl": format!("https://audio.example/{itunes_id}.m4a"),
        "releaseDate": "1997-08-25",
        "durationInSeconds": 264,
        "genre": "Alternative",
        "artist": {
            "name": "Radiohead",
            "iTunesId": 657515,
            "iTunesViewUrl": "https://music.example/artist/657515",
            "genre": "Alternative"
        },
        "album": {
            "name": "OK Computer",
            "portrait": "https://img.example/okc.jpg",
            "iTunesId": 1097861387,
            "iTunesViewUrl": "https://music.example/album/1097861387",
            "releaseDate": "1997-05-21",
            "genre": "Alternative"
        }
    })
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn favoriting_twice_keeps_one_edge_and_one_catalog_row() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let user = seed_user(&pool, "ada");
    let token = generate_jwt(&user, &config.jwt_secret);
    let app = test_app!(pool, config);

    let body = json!({ "songToBeFavorited": song_payload_json(1097862015) });

    let resp = test::TestRequest::post()
        .uri("/favorites/song")
        .insert_header(bearer(&token))
        .set_json(&body)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 201);

    let resp = test::TestRequest::post()
        .uri("/favorites/song")
        .insert_header(bearer(&token))
        .set_json(&body)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 409);

    let mut conn = pool.get().unwrap();
    let artist_count: i64 = artists::table.count().get_result(&mut conn).unwrap();
    let album_count: i64 = albums::table.count().get_result(&mut conn).unwrap();
    let song_count: i64 = songs::table.count().get_result(&mut conn).unwrap();
    let edge_count: i64 = favorite_songs::table.count().get_result(&mut conn).unwrap();
    assert_eq!(
        (artist_count, album_count, song_count, edge_count),
        (1, 1, 1, 1)
    );
}

#[actix_web::test]
async fn favorites_listing_returns_joined_entries() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let user = seed_user(&pool, "ada");
    let token = generate_jwt(&user, &config.jwt_secret);
    let app = test_app!(pool, config);

    let resp = test::TestRequest::post()
        .uri("/favorites/song")
        .insert_header(bearer(&token))
        .set_json(json!({ "songToBeFavorited": song_payload_json(1097862015) }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/favorites")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;

    let fav_songs = body["favoriteSongs"].as_array().unwrap();
    assert_eq!(fav_songs.len(), 1);
    assert_eq!(fav_songs[0]["song"]["iTunesId"], 1097862015);
    assert_eq!(fav_songs[0]["song"]["artist"]["name"], "Radiohead");
    assert!(body["favoriteAlbums"].as_array().unwrap().is_empty());
    assert!(body["favoriteArtists"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn unfavoriting_unknown_song_is_not_found() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let user = seed_user(&pool, "ada");
    let token = generate_jwt(&user, &config.jwt_secret);
    let app = test_app!(pool, config);

    let resp = test::TestRequest::delete()
        .uri("/favorites/song")
        .insert_header(bearer(&token))
        .set_json(json!({ "songToBeUnfavorited": { "iTunesId": 42 } }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn anonymous_listing_is_public_only_and_owner_sees_private() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    let bob = seed_user(&pool, "bob");
    seed_playlist(&pool, &ada, "ada-public", true);
    seed_playlist(&pool, &ada, "ada-private", false);
    seed_playlist(&pool, &bob, "bob-private", false);
    let token = generate_jwt(&ada, &config.jwt_secret);
    let app = test_app!(pool, config);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/playlists").to_request(),
    )
    .await;
    let names: Vec<&str> = body["playlists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ada-public"]);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/playlists")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    let mut names: Vec<&str> = body["playlists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["ada-private", "ada-public"]);

    // A bogus token degrades to the public listing instead of failing
    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/playlists")
            .insert_header(("Authorization", "Bearer bogus"))
            .to_request(),
    )
    .await;
    assert_eq!(body["playlists"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn private_playlist_is_owner_only() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    let bob = seed_user(&pool, "bob");
    let playlist = seed_playlist(&pool, &ada, "secret-mix", false);
    {
        let mut conn = pool.get().unwrap();
        let payload = serde_json::from_value(song_payload_json(1097862015)).unwrap();
        let song = upsert_song_graph(&mut conn, &payload).unwrap();
        diesel::insert_into(playlist_songs::table)
            .values(&NewPlaylistSong {
                id: Uuid::new_v4().to_string(),
                playlist_id: playlist.id.clone(),
                song_id: song.id,
                added_at: day(3),
            })
            .execute(&mut conn)
            .unwrap();
    }
    let ada_token = generate_jwt(&ada, &config.jwt_secret);
    let bob_token = generate_jwt(&bob, &config.jwt_secret);
    let app = test_app!(pool, config);
    let uri = format!("/playlists/{}", playlist.id);

    let resp = test::TestRequest::get().uri(&uri).send_request(&app).await;
    assert_eq!(resp.status(), 403);

    let resp = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&bob_token))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 403);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&ada_token))
            .to_request(),
    )
    .await;
    assert_eq!(body["name"], "secret-mix");
    assert_eq!(body["user"]["name"], "ada");
    let entries = body["songs"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["song"]["name"], "song-1097862015");
    assert_eq!(entries[0]["song"]["artist"]["name"], "Radiohead");
    assert_eq!(entries[0]["song"]["album"]["name"], "OK Computer");

    let resp = test::TestRequest::get()
        .uri("/playlists/no-such-id")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn public_playlist_is_readable_anonymously() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    let playlist = seed_playlist(&pool, &ada, "road-trip", true);
    let app = test_app!(pool, config);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/playlists/{}", playlist.id))
            .to_request(),
    )
    .await;
    assert_eq!(body["name"], "road-trip");
    assert_eq!(body["isPublic"], true);
}

#[actix_web::test]
async fn own_listing_orders_pinned_first_then_newest() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    seed_playlist_at(&pool, &ada, "old", false, day(1), None);
    seed_playlist_at(&pool, &ada, "new", false, day(10), None);
    seed_playlist_at(&pool, &ada, "pinned-early", false, day(2), Some(day(20)));
    seed_playlist_at(&pool, &ada, "pinned-late", false, day(3), Some(day(25)));
    let token = generate_jwt(&ada, &config.jwt_secret);
    let app = test_app!(pool, config);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/playlists/user")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    let names: Vec<&str> = body["playlists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["pinned-late", "pinned-early", "new", "old"]);
}

#[actix_web::test]
async fn creating_a_playlist_checks_body_owner_against_token() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    let token = generate_jwt(&ada, &config.jwt_secret);
    let app = test_app!(pool, config);

    let resp = test::TestRequest::post()
        .uri("/playlists")
        .insert_header(bearer(&token))
        .set_json(json!({ "userId": "someone-else", "name": "Gym", "isPublic": false }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 403);

    let resp = test::TestRequest::post()
        .uri("/playlists")
        .insert_header(bearer(&token))
        .set_json(json!({ "userId": ada.id, "name": "Gym", "isPublic": false }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 201);

    let resp = test::TestRequest::post()
        .uri("/playlists")
        .set_json(json!({ "userId": ada.id, "name": "Gym", "isPublic": false }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn pin_update_roundtrip_sets_and_clears_fixed_at() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    let playlist = seed_playlist(&pool, &ada, "mix", false);
    let token = generate_jwt(&ada, &config.jwt_secret);
    let app = test_app!(pool, config);
    let uri = format!("/playlists/{}", playlist.id);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "isFixed": true, "fixedAt": "2024-05-01T12:00:00.000Z" }))
            .to_request(),
    )
    .await;
    assert_eq!(body["playlist"]["isFixed"], true);
    assert_eq!(body["playlist"]["fixedAt"], "2024-05-01T12:00:00");

    // absent fixedAt keeps the stored value
    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "mix v2" }))
            .to_request(),
    )
    .await;
    assert_eq!(body["playlist"]["name"], "mix v2");
    assert_eq!(body["playlist"]["fixedAt"], "2024-05-01T12:00:00");

    // explicit null clears it
    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "isFixed": false, "fixedAt": null }))
            .to_request(),
    )
    .await;
    assert_eq!(body["playlist"]["isFixed"], false);
    assert!(body["playlist"]["fixedAt"].is_null());
}

#[actix_web::test]
async fn adding_and_removing_playlist_songs() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    let bob = seed_user(&pool, "bob");
    let playlist = seed_playlist(&pool, &ada, "mix", false);
    let ada_token = generate_jwt(&ada, &config.jwt_secret);
    let bob_token = generate_jwt(&bob, &config.jwt_secret);
    let app = test_app!(pool, config);
    let uri = format!("/playlists/{}/songs", playlist.id);

    // only the owner may add songs
    let resp = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&bob_token))
        .set_json(json!({ "newSong": song_payload_json(1097862015) }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 403);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&ada_token))
            .set_json(json!({ "newSong": song_payload_json(1097862015) }))
            .to_request(),
    )
    .await;
    let entry_id = body["addedSong"]["id"].as_str().unwrap().to_string();

    let resp = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&ada_token))
        .set_json(json!({ "songToRemove": { "id": entry_id } }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);

    // already gone
    let resp = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&ada_token))
        .set_json(json!({ "songToRemove": { "id": entry_id } }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn deleting_a_playlist_removes_membership_rows() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    let playlist = seed_playlist(&pool, &ada, "mix", false);
    let token = generate_jwt(&ada, &config.jwt_secret);
    let app = test_app!(pool, config);

    for itunes_id in [1097862015_i64, 1097862016] {
        let resp = test::TestRequest::post()
            .uri(&format!("/playlists/{}/songs", playlist.id))
            .insert_header(bearer(&token))
            .set_json(json!({ "newSong": song_payload_json(itunes_id) }))
            .send_request(&app)
            .await;
        assert_eq!(resp.status(), 201);
    }

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/playlists/{}", playlist.id))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(body["deletedSongs"], 2);

    let mut conn = pool.get().unwrap();
    let remaining: i64 = playlist_songs::table
        .filter(playlist_songs::playlist_id.eq(&playlist.id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(remaining, 0);

    let resp = test::TestRequest::get()
        .uri(&format!("/playlists/{}", playlist.id))
        .insert_header(bearer(&token))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn genre_browse_filters_and_truncates() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    for itunes_id in 1..=10 {
        seed_genre_song(&pool, itunes_id, "rock");
    }
    seed_genre_song(&pool, 11, "pop");
    let app = test_app!(pool, config);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/songs/rock?limit=3")
            .to_request(),
    )
    .await;
    let songs = body["songs"].as_array().unwrap();
    assert_eq!(songs.len(), 3);
    for song in songs {
        assert_eq!(song["genre"], "rock");
    }

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/songs/rock").to_request(),
    )
    .await;
    assert_eq!(body["songs"].as_array().unwrap().len(), 10);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/songs/jazz").to_request(),
    )
    .await;
    assert!(body["songs"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn profile_read_and_owner_only_update() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let ada = seed_user(&pool, "ada");
    let bob = seed_user(&pool, "bob");
    seed_playlist(&pool, &ada, "ada-public", true);
    seed_playlist(&pool, &ada, "ada-private", false);
    let ada_token = generate_jwt(&ada, &config.jwt_secret);
    let bob_token = generate_jwt(&bob, &config.jwt_secret);
    let secret = config.jwt_secret.clone();
    let app = test_app!(pool, config);
    let uri = format!("/users/{}", ada.id);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri(&uri).to_request(),
    )
    .await;
    assert_eq!(body["user"]["name"], "ada");
    let playlist_names: Vec<&str> = body["user"]["playlists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(playlist_names, vec!["ada-public"]);

    let resp = test::TestRequest::get()
        .uri("/users/no-such-user")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);

    let resp = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&bob_token))
        .set_json(json!({ "name": "mallory" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 403);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&ada_token))
            .set_json(json!({ "name": "ada lovelace" }))
            .to_request(),
    )
    .await;
    let claims = verify_jwt(body["token"].as_str().unwrap(), &secret).unwrap();
    assert_eq!(claims.sub, ada.id);
    assert_eq!(claims.name, "ada lovelace");
}

#[actix_web::test]
async fn registration_aborts_when_the_provider_is_unreachable() {
    let (pool, _db_file) = test_pool();
    let config = test_config();
    let app = test_app!(pool, config);

    // bogus code: the exchange fails either with a transport error or a
    // provider rejection, never with a half-registered user
    let resp = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "code": "bogus-code" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 502);

    let mut conn = pool.get().unwrap();
    let user_count: i64 = encore_server::schema::users::table
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(user_count, 0);
}
