use std::{path::PathBuf, str::FromStr};

use anyhow::{Result, anyhow};

use crate::config::{
    config_model::{DotEnvyConfig, Server, Storage, StorageBackend},
    stage::Stage,
};

const DEFAULT_STORAGE_PATH: &str = "lingji_storage.json";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup. Unset or blank keys take their defaults;
/// keys that are set but unparsable are errors.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let server = Server {
        port: parse_or(&lookup, "SERVER_PORT", 8080)?,
        body_limit: parse_or(&lookup, "SERVER_BODY_LIMIT", 1)?,
        timeout: parse_or(&lookup, "SERVER_TIMEOUT", 30)?,
    };

    let storage = Storage {
        backend: parse_or(&lookup, "ENTITLEMENT_STORAGE", StorageBackend::File)?,
        path: non_blank(&lookup, "ENTITLEMENT_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
    };

    let stage = match non_blank(&lookup, "STAGE") {
        Some(raw) => Stage::try_from(&raw)?,
        None => Stage::default(),
    };

    Ok(DotEnvyConfig {
        server,
        storage,
        stage,
    })
}

fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|err| anyhow!("{key} is invalid: {err}")),
        None => Ok(default),
    }
}
