use anyhow::Context;
use serde::Deserialize;
use time::{macros::format_description, UtcOffset};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct HouseholdConfig {
    pub id: Option<Uuid>,
    pub name: String,
    /// Offset used to decide what "today" and "this week" mean.
    pub utc_offset: UtcOffset,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub household: HouseholdConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let household = HouseholdConfig {
            id: match std::env::var("HOUSEHOLD_ID") {
                Ok(raw) => Some(Uuid::parse_str(raw.trim()).context("HOUSEHOLD_ID must be a UUID")?),
                Err(_) => None,
            },
            name: std::env::var("HOUSEHOLD_NAME").unwrap_or_else(|_| "Our Household".into()),
            utc_offset: match std::env::var("HOUSEHOLD_UTC_OFFSET") {
                Ok(raw) => parse_utc_offset(&raw)?,
                Err(_) => UtcOffset::UTC,
            },
        };
        Ok(Self {
            database_url,
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            household,
        })
    }
}

/// Parses `+HH:MM` / `-HH:MM`.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(
        raw.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid HOUSEHOLD_UTC_OFFSET {raw:?}, expected +HH:MM"))
}
