//! # sheetchart backend
//!
//! Entry point of the spreadsheet charting service. `main` reads `AppConfig` from the
//! environment, opens the SQLite store and the upload directory, creates the admin
//! account when `ADMIN_PASSWORD` is set, starts the retention sweep and then serves
//! the `/api` scopes.
//!
//! Logging goes through `env_logger` and defaults to `info`; set `RUST_LOG` to change it.

mod auth;
mod config;
mod error;
mod retention;
mod services;
mod settings;
mod state;
mod storage;
mod store;

#[cfg(test)]
mod test_support;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::storage::UploadStorage;
use crate::store::Store;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};
use std::fmt::Display;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::from_env();

    let store = Store::open(&config.database_path).map_err(startup_error)?;
    let uploads = UploadStorage::new(&config.upload_dir)?;

    match &config.admin_password {
        Some(password) => {
            auth::ensure_admin(&store, &config.admin_email, password).map_err(startup_error)?
        }
        None => {
            if !store.admin_exists().map_err(startup_error)? {
                warn!("no admin account exists; set ADMIN_PASSWORD to create one");
            }
        }
    }

    let state = AppState::new(store, uploads).map_err(startup_error)?;

    // Start retention sweeper task
    let sweeper_state = state.clone();
    let sweep_period = config.retention_sweep;
    tokio::spawn(async move {
        retention::start_retention_sweeper(sweeper_state, sweep_period).await;
    });

    info!(
        "Server running at {} (database {}, uploads in {})",
        config.url(),
        config.database_path.display(),
        state.uploads.root().display()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn startup_error(err: impl Display) -> io::Error {
    io::Error::other(err.to_string())
}
