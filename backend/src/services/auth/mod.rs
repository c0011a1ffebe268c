//! # Auth Service Module
//!
//! Account routes under `/api/auth`. `register` and `login` hand back an opaque
//! bearer token; `me` and `logout` require one.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod login;
mod logout;
mod me;
mod register;

#[cfg(test)]
mod tests;

const API_PATH: &str = "/api/auth";
const MIN_PASSWORD_LEN: usize = 6;

/// Configures and returns the Actix `Scope` for the account routes.
///
/// # Registered Routes:
///
/// *   **`POST /register`**:
///     - **Handler**: `register::process`
///     - **Description**: Creates a `user` account and signs it in.
///
/// *   **`POST /login`**:
///     - **Handler**: `login::process`
///     - **Description**: Exchanges email and password for a new session token.
///
/// *   **`GET /me`**:
///     - **Handler**: `me::process`
///     - **Description**: The account behind the presented token.
///
/// *   **`GET /logout`**:
///     - **Handler**: `logout::process`
///     - **Description**: Ends the presented session.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/register", post().to(register::process))
        .route("/login", post().to(login::process))
        .route("/me", get().to(me::process))
        .route("/logout", get().to(logout::process))
}
