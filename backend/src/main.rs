mod config;
mod db;
mod error;
mod logging;
mod services;
mod time;

use crate::config::Config;
use crate::db::Database;
use crate::error::ApiError;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};

fn startup_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    config::set_dev_mode(config.dev_mode);

    let db = Database::new(&config.database_path).map_err(startup_error)?;
    db.create_schema().await.map_err(startup_error)?;

    if let Some(seed_path) = &config.seed_path {
        match db::seed::run(&db, seed_path).await {
            Ok(summary) => info!(
                "Seeded {} businesses, {} users, {} reviews ({} categories, {} skipped)",
                summary.businesses,
                summary.users,
                summary.reviews,
                summary.categories,
                summary.skipped
            ),
            Err(ApiError::InvalidOperation(reason)) => {
                info!("Skipping seed: {}", reason);
            }
            Err(e) => {
                warn!("Seeding from {} failed: {}", seed_path, e);
            }
        }
    }

    let url = format!("http://{}:{}", config.host, config.port);
    info!("Server running at {}", url);

    let data = web::Data::new(db);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(services::reviews::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
