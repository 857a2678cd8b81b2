use std::collections::HashSet;
use std::env;
use std::time::Duration;

use crate::actions::RESERVED_BUTTONS;
use crate::error::ConfigError;
use crate::state_store::DEFAULT_SHARDS;

const TELEGRAM_SECRET_ENV: &str = "TELEGRAM_SECRET";
const NOTION_SECRET_ENV: &str = "NOTION_SECRET";
const NOTION_DATABASE_ID_ENV: &str = "NOTION_DATABASE_ID";
const NOTION_PUBLIC_URL_ENV: &str = "NOTION_PUBLIC_URL";
const NOTION_TIMEOUT_ENV: &str = "NOTION_TIMEOUT";
const WORKERS_ENV: &str = "BOT_WORKERS";
const POLL_TIMEOUT_ENV: &str = "BOT_POLL_TIMEOUT";
const QUEUE_CAPACITY_ENV: &str = "BOT_QUEUE_CAPACITY";
const STATE_SHARDS_ENV: &str = "BOT_STATE_SHARDS";
const CATEGORIES_ENV: &str = "BOT_CATEGORIES";

pub const DEFAULT_CATEGORIES: [&str; 3] = ["коммуналка", "продукты", "развлечения"];

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub notion_secret: String,
    pub notion_database_id: String,
    pub notion_public_url: Option<String>,
    pub notion_timeout: Duration,
    pub workers: usize,
    pub poll_timeout: Duration,
    pub queue_capacity: usize,
    pub state_shards: usize,
    pub categories: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Разбор конфигурации из произвольного источника пар ключ-значение.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let number = |key: &'static str, default: usize, min: usize| -> Result<usize, ConfigError> {
            let Some(raw) = lookup(key) else {
                return Ok(default);
            };
            let value: usize = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key,
                reason: format!("{:?} is not a number", raw),
            })?;
            if value < min {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("must be at least {}", min),
                });
            }
            Ok(value)
        };

        let categories = match lookup(CATEGORIES_ENV) {
            Some(raw) => parse_categories(&raw)?,
            None => DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        };

        Ok(Self {
            telegram_token: required(TELEGRAM_SECRET_ENV)?,
            notion_secret: required(NOTION_SECRET_ENV)?,
            notion_database_id: required(NOTION_DATABASE_ID_ENV)?,
            notion_public_url: lookup(NOTION_PUBLIC_URL_ENV).filter(|url| !url.trim().is_empty()),
            notion_timeout: Duration::from_secs(number(NOTION_TIMEOUT_ENV, 15, 1)? as u64),
            workers: number(WORKERS_ENV, 2, 1)?,
            poll_timeout: Duration::from_secs(number(POLL_TIMEOUT_ENV, 30, 0)? as u64),
            queue_capacity: number(QUEUE_CAPACITY_ENV, 64, 1)?,
            state_shards: number(STATE_SHARDS_ENV, DEFAULT_SHARDS, 1)?,
            categories,
        })
    }
}

fn parse_categories(raw: &str) -> Result<Vec<String>, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: CATEGORIES_ENV,
        reason,
    };

    let mut seen = HashSet::new();
    let mut categories = Vec::new();

    for category in raw.split(',').map(str::trim) {
        if category.is_empty() {
            return Err(invalid("empty category name".to_string()));
        }
        if RESERVED_BUTTONS.contains(&category) {
            return Err(invalid(format!("{:?} clashes with a button identifier", category)));
        }
        if !seen.insert(category) {
            return Err(invalid(format!("duplicate category {:?}", category)));
        }
        categories.push(category.to_string());
    }

    Ok(categories)
}
