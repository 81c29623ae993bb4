use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DEFAULT_ONSITE_LOCATION: &str = "https://maps.app.goo.gl/WLVM69QkbntDG2Tq7";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub jwt_secret: String,
    pub workbook_path: PathBuf,
    pub candidates_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub users_path: PathBuf,
    pub onsite_location: String,
    pub token_ttl_hours: i64,
    pub max_upload_mb: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let data_dir = PathBuf::from(get_env_or("DATA_DIR", "./data"));

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            jwt_secret: get_env("JWT_SECRET")?,
            workbook_path: get_path_or("WORKBOOK_PATH", data_dir.join("hr_tracker.xlsx")),
            candidates_dir: get_path_or("CANDIDATES_DIR", data_dir.join("Candidates")),
            templates_dir: get_path_or("TEMPLATES_DIR", data_dir.join("templates")),
            users_path: get_path_or("USERS_PATH", data_dir.join("users.json")),
            onsite_location: get_env_or("ONSITE_LOCATION", DEFAULT_ONSITE_LOCATION),
            token_ttl_hours: get_env_parse_or("TOKEN_TTL_HOURS", 12)?,
            max_upload_mb: get_env_parse_or("MAX_UPLOAD_MB", 25)?,
        })
    }

    /// Configuration rooted in a single directory, used by tests and local tooling.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>, jwt_secret: impl Into<String>) -> Self {
        let data_dir = data_dir.into();
        Self {
            server_address: "127.0.0.1:0".to_string(),
            jwt_secret: jwt_secret.into(),
            workbook_path: data_dir.join("hr_tracker.xlsx"),
            candidates_dir: data_dir.join("Candidates"),
            templates_dir: data_dir.join("templates"),
            users_path: data_dir.join("users.json"),
            onsite_location: DEFAULT_ONSITE_LOCATION.to_string(),
            token_ttl_hours: 12,
            max_upload_mb: 25,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_path_or(name: &str, default: PathBuf) -> PathBuf {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or(default)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
