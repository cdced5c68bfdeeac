//! Runtime settings read from the environment at startup.
//!
//! | Variable                   | Default              |
//! |----------------------------|----------------------|
//! | `ISO_TRACKER_HOST`         | `127.0.0.1`          |
//! | `ISO_TRACKER_PORT`         | `8080`               |
//! | `ISO_TRACKER_DB`           | `iso_tracker.sqlite` |
//! | `ISO_TRACKER_OPEN_BROWSER` | `true`               |
//! | `ISO_TRACKER_JSON_LIMIT`   | `10485760` (10 MB)   |
//!
//! A value that cannot be parsed is reported with a warning and replaced by
//! its default, so a typo never prevents the server from starting.

use log::warn;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB: &str = "iso_tracker.sqlite";
const DEFAULT_JSON_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub open_browser: bool,
    pub json_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB),
            open_browser: true,
            json_limit: DEFAULT_JSON_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            host: text("ISO_TRACKER_HOST").unwrap_or(defaults.host),
            port: parsed(text("ISO_TRACKER_PORT"), "ISO_TRACKER_PORT", defaults.port),
            db_path: text("ISO_TRACKER_DB").map(PathBuf::from).unwrap_or(defaults.db_path),
            open_browser: match text("ISO_TRACKER_OPEN_BROWSER") {
                None => defaults.open_browser,
                Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                    warn!("ignoring ISO_TRACKER_OPEN_BROWSER={raw}: expected true or false");
                    defaults.open_browser
                }),
            },
            json_limit: parsed(
                text("ISO_TRACKER_JSON_LIMIT"),
                "ISO_TRACKER_JSON_LIMIT",
                defaults.json_limit,
            ),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parsed<T: FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("ignoring {key}={raw}: not a valid value");
            default
        }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
