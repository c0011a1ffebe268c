//! Request identity.
//!
//! Clients send `Authorization: Bearer <token>`; the token is looked up in the
//! session table and the resulting `Principal` is handed to the handler. Use
//! `AdminPrincipal` as the extractor on routes restricted to administrators.

pub mod password;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::Store;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use common::model::user::{Role, User};
use futures_util::future::{ready, Ready};
use log::info;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    pub token: String,
}

impl Principal {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }

    /// Owners always pass; admins pass when `admin_allowed` is set.
    pub fn can_access(&self, owner_id: &str, admin_allowed: bool) -> bool {
        self.id() == owner_id || (admin_allowed && self.is_admin())
    }
}

/// A `Principal` whose role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> ApiResult<Principal> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state is not registered".to_string()))?;
    let token = bearer_token(req)
        .ok_or_else(|| ApiError::Unauthorized("Not authorized to access this route".to_string()))?;
    let user = state
        .store
        .user_for_token(token)?
        .ok_or_else(|| ApiError::Unauthorized("Not authorized to access this route".to_string()))?;
    Ok(Principal {
        user,
        token: token.to_string(),
    })
}

impl FromRequest for Principal {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for AdminPrincipal {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|principal| {
            if principal.is_admin() {
                Ok(AdminPrincipal(principal))
            } else {
                Err(ApiError::Forbidden("Not authorized as admin".to_string()))
            }
        }))
    }
}

/// Creates the bootstrap administrator unless the email is already registered.
pub fn ensure_admin(store: &Store, email: &str, password: &str) -> ApiResult<()> {
    if store.email_taken(email)? {
        return Ok(());
    }
    let hash = password::hash_password(password)?;
    store.insert_user("Administrator", email, &hash, Role::Admin)?;
    info!("created bootstrap admin account {}", email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc123"));

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer   "))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn ensure_admin_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        ensure_admin(&store, "root@example.com", "s3cret-pass").unwrap();
        ensure_admin(&store, "root@example.com", "other").unwrap();

        let (user, hash) = store.find_credentials("root@example.com").unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(password::verify_password("s3cret-pass", &hash));
    }

    #[test]
    fn access_rules() {
        let user = |role| Principal {
            user: User {
                id: "u1".to_string(),
                name: "n".to_string(),
                email: "e".to_string(),
                role,
                created_at: chrono::Utc::now(),
            },
            token: "t".to_string(),
        };
        assert!(user(Role::User).can_access("u1", false));
        assert!(!user(Role::User).can_access("u2", true));
        assert!(user(Role::Admin).can_access("u2", true));
        assert!(!user(Role::Admin).can_access("u2", false));
    }
}
