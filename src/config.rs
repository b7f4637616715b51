use std::path::PathBuf;

#[derive(Debug)]
pub struct Config {
    pub db_connection_string: String,
    pub storage_root: PathBuf,
    pub public_base_url: String,
    pub admin_email: String,
    pub admin_password: String,
}

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://db.sqlite?mode=rwc";
const DEFAULT_STORAGE_ROOT: &str = "storage";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

impl Config {
    pub fn load() -> Self {
        let db_connection_string =
            std::env::var("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        let storage_root = std::env::var("STORAGE_ROOT").unwrap_or(DEFAULT_STORAGE_ROOT.into());
        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or(DEFAULT_PUBLIC_BASE_URL.into());
        let admin_email = std::env::var("ADMIN_EMAIL").unwrap_or_default();
        let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_default();
        Config {
            db_connection_string,
            storage_root: PathBuf::from(storage_root),
            public_base_url,
            admin_email,
            admin_password,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.admin_email.is_empty() {
            return Err("ADMIN_EMAIL is missing".into());
        }
        if self.admin_password.is_empty() {
            return Err("ADMIN_PASSWORD is missing".into());
        }
        Ok(())
    }
}
