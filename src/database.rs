use sqlx::{
    migrate,
    postgres::{PgConnectOptions, PgPoolOptions},
    Pool, Postgres,
};
use std::{env, str::FromStr};
use tracing::{error, info};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

pub async fn get_connection_pool() -> Pool<Postgres> {
    info!("Attempting to connect to a database…");
    let connection_pool = match connect_to_database().await {
        Ok(connection_pool) => connection_pool,
        Err(e) => {
            error!("Error connecting to the database: {e}");
            panic!();
        }
    };
    info!("Connection with the database successful");
    connection_pool
}

async fn connect_to_database() -> Result<Pool<Postgres>, sqlx::Error> {
    let connection_uri =
        env::var("DATABASE_URL").expect("DATABASE_URL must be defined in .env");
    let options = PgConnectOptions::from_str(&connection_uri)?;

    PgPoolOptions::new()
        .max_connections(get_max_connections())
        .connect_with(options)
        .await
}

fn get_max_connections() -> u32 {
    match env::var("DATABASE_MAX_CONNECTIONS") {
        Ok(value) => match value.parse() {
            Ok(num) => num,
            Err(e) => {
                error!("Error parsing DATABASE_MAX_CONNECTIONS environment variable: {e}");
                panic!();
            }
        },
        Err(_) => DEFAULT_MAX_CONNECTIONS,
    }
}

pub async fn perform_migrations(pool: &Pool<Postgres>) {
    match migrate!("./migrations").run(pool).await {
        Ok(_) => info!("Database migrations successful."),
        Err(e) => {
            error!("Error performing database migrations: {e}");
            panic!();
        }
    }
}
