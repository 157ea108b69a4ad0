use serde::Deserialize;
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::add_friend::DEFAULT_IMAGE;
use crate::error::ConfigError;

const DEFAULT_CONFIG_PATH: &str = "eatsplit.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub bind: String,
    pub currency: String,
    pub default_image: String,
    pub seed_demo_friends: bool,
    pub allowed_origin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".into(),
            currency: "NT$".into(),
            default_image: DEFAULT_IMAGE.into(),
            seed_demo_friends: true,
            allowed_origin: "http://localhost:3000".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    bind: Option<String>,
    currency: Option<String>,
    default_image: Option<String>,
    seed_demo_friends: Option<bool>,
    allowed_origin: Option<String>,
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = env::var("EATSPLIT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut settings = Settings::default();
    if let Some(file) = read_file_settings(&path)? {
        settings = merge_file(settings, file);
    }
    merge_env(settings, |key| env::var(key).ok())
}

fn read_file_settings(path: &Path) -> Result<Option<FileSettings>, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_file_settings(&raw)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_file_settings(raw: &str) -> Result<FileSettings, toml::de::Error> {
    toml::from_str(raw)
}

fn merge_file(mut settings: Settings, file: FileSettings) -> Settings {
    if let Some(v) = file.bind {
        settings.bind = v;
    }
    if let Some(v) = file.currency {
        settings.currency = v;
    }
    if let Some(v) = file.default_image {
        settings.default_image = v;
    }
    if let Some(v) = file.seed_demo_friends {
        settings.seed_demo_friends = v;
    }
    if let Some(v) = file.allowed_origin {
        settings.allowed_origin = v;
    }
    settings
}

fn merge_env(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    if let Some(v) = lookup("EATSPLIT_BIND") {
        settings.bind = v;
    }
    if let Some(v) = lookup("EATSPLIT_CURRENCY") {
        settings.currency = v;
    }
    if let Some(v) = lookup("EATSPLIT_DEFAULT_IMAGE") {
        settings.default_image = v;
    }
    if let Some(v) = lookup("EATSPLIT_SEED_DEMO") {
        settings.seed_demo_friends = parse_bool("EATSPLIT_SEED_DEMO", v)?;
    }
    if let Some(v) = lookup("EATSPLIT_ALLOWED_ORIGIN") {
        settings.allowed_origin = v;
    }
    Ok(settings)
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}
