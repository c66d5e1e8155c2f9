use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// SQLite database file
    pub db_path: String,
    /// Directory for uploaded and processed images, served under /uploads
    pub upload_dir: PathBuf,
    /// Upload cap in MiB
    pub max_upload_mb: u64,
    /// Width processed images are resized to
    pub img_max_width: u32,
    /// JPEG quality, clamped to the encoder's 1-100 range when used
    pub img_quality: u8,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_or(env::var("PORT").ok(), "PORT", 8080),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "./recipe.db".to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./public/temp".to_string())
                .into(),
            max_upload_mb: parse_or(env::var("MAX_UPLOAD_SIZE").ok(), "MAX_UPLOAD_SIZE", 10),
            img_max_width: parse_or(env::var("IMG_MAX_WIDTH").ok(), "IMG_MAX_WIDTH", 800),
            img_quality: parse_or(env::var("IMG_QUALITY").ok(), "IMG_QUALITY", 80),
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb << 20
    }
}

/// Unset or unparsable values fall back to the default, with a warning for
/// the unparsable case.
fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!("Invalid {key} value {value:?}, using default");
            default
        }),
        None => default,
    }
}
