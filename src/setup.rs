use axum::http::{header, HeaderValue, Method};
use sqlx::{Pool, Postgres};
use std::env;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use url::Url;

use crate::{database, users::founder::guarantee_founder};

const DEFAULT_PORT: u16 = 2023;

pub fn initialise_logging() {
    let level = match env::var("LOG_LEVEL") {
        Ok(value) => Level::from_str(&value).unwrap_or(Level::INFO),
        Err(_) => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default tracing subscriber failed!");
    info!("NG Manager spinning up...");
}

pub fn report_listener_socket_addr(listener: &TcpListener) {
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Error getting listener socket address: {e}");
            panic!();
        }
    };
    info!("Listener socket address is: {addr}");
}

fn get_env_port() -> u16 {
    let portstr = match env::var("PORT") {
        Ok(value) => value,
        Err(_) => return DEFAULT_PORT,
    };

    match portstr.parse() {
        Ok(num) => num,
        Err(e) => {
            error!("Error parsing PORT environment variable: {e}");
            panic!();
        }
    }
}

pub fn get_socket_addr() -> SocketAddrV4 {
    SocketAddrV4::new(Ipv4Addr::new(0, 0, 0, 0), get_env_port())
}

#[derive(Clone)]
pub struct AppState {
    pub connection_pool: Pool<Postgres>,
}

pub async fn create_app_state() -> AppState {
    let connection_pool = database::get_connection_pool().await;
    database::perform_migrations(&connection_pool).await;
    AppState { connection_pool }
}

/// A missing .env is fine, variables may come from the environment itself.
pub fn read_environmental_variables() {
    match dotenvy::dotenv() {
        Ok(path) => info!("loaded {}", path.display()),
        Err(e) if e.not_found() => info!("no .env file found, using process environment"),
        Err(e) => {
            error!("Error reading .env file: {e}");
            panic!();
        }
    }
}

/// Lets the browser frontend call the API with its session cookie.
/// Without FRONTEND_ORIGIN no cross-origin requests are allowed.
pub fn cors_layer() -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let origin = match env::var("FRONTEND_ORIGIN") {
        Ok(origin) => origin,
        Err(_) => return layer,
    };
    match parse_origin(&origin) {
        Some(value) => layer.allow_origin(value),
        None => {
            warn!("FRONTEND_ORIGIN \"{origin}\" is not a valid origin, ignoring it");
            layer
        }
    }
}

fn parse_origin(origin: &str) -> Option<HeaderValue> {
    let url = Url::parse(origin).ok()?;
    if !url.has_host() {
        return None;
    }
    HeaderValue::from_str(&url.origin().ascii_serialization()).ok()
}

pub async fn promote_configured_founder(state: &AppState) {
    let username = match env::var("FOUNDER_USERNAME") {
        Ok(username) if !username.is_empty() => username,
        _ => return,
    };
    if let Err(e) = guarantee_founder(&username, &state.connection_pool).await {
        error!("Could not guarantee founder \"{username}\": {e}");
    }
}

#[test]
fn origins_are_normalised() {
    assert_eq!(
        parse_origin("https://ngmanager.example/dashboard").unwrap(),
        "https://ngmanager.example"
    );
    assert_eq!(
        parse_origin("http://localhost:3000").unwrap(),
        "http://localhost:3000"
    );
    assert!(parse_origin("not a url").is_none());
    assert!(parse_origin("data:text/plain,hi").is_none());
}
