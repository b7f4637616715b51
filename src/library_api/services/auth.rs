use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use poem_openapi::payload::Json;
use uuid::Uuid;

use crate::config::Config;
use crate::library_api::models::{ErrorDto, LoginResponseDto, SessionDto};

/// Sessions expire after this long; there is no refresh, the admin just logs
/// in again.
const SESSION_TTL_HOURS: i64 = 12;

/// In-memory admin sessions. Tokens are opaque uuids; a restart logs everyone
/// out, which is acceptable for a single-admin library.
#[derive(Debug, Default)]
pub struct SessionStore {
    issued: RwLock<HashMap<Uuid, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Uuid {
        let token = Uuid::new_v4();
        if let Ok(mut issued) = self.issued.write() {
            issued.insert(token, Utc::now());
        }
        token
    }

    pub fn is_valid(&self, token: &str) -> bool {
        let Ok(token) = Uuid::parse_str(token) else {
            return false;
        };
        let Ok(issued) = self.issued.read() else {
            return false;
        };
        issued
            .get(&token)
            .is_some_and(|at| Utc::now() - *at < Duration::hours(SESSION_TTL_HOURS))
    }
}

pub struct AuthService<'a> {
    pub config: &'a Config,
    pub sessions: &'a SessionStore,
}

impl<'a> AuthService<'a> {
    pub fn new(config: &'a Config, sessions: &'a SessionStore) -> Self {
        Self { config, sessions }
    }

    #[tracing::instrument(level = "debug", skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> LoginResponseDto {
        if email != self.config.admin_email || password != self.config.admin_password {
            tracing::info!(%email, "rejected login");
            return LoginResponseDto::Unauthorized(Json(ErrorDto {
                message: "Invalid email or password".into(),
            }));
        }
        let token = self.sessions.issue();
        tracing::info!(%email, "admin logged in");
        LoginResponseDto::Ok(Json(SessionDto { token }))
    }
}
