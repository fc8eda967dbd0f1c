use anyhow::{Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use crate::scheduler::DailyTrigger;

const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
const ENV_PREFIX: &str = "SOLAR__";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub model: ModelConfig,
    pub site: SiteConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Run `sql/schema.sql` on startup.
    #[serde(default)]
    pub apply_schema: bool,
}

impl DbConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// IANA timezone name used to turn measurement instants into calendar dates.
    pub timezone: String,
}

impl SiteConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid site.timezone '{}': {e}", self.timezone))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Local wall-clock time, `HH:MM`.
    pub time: String,
}

impl ScheduleConfig {
    pub fn fire_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M")
            .with_context(|| format!("invalid schedule.time '{}', expected HH:MM", self.time))
    }

    pub fn trigger(&self, tz: Tz) -> Result<DailyTrigger> {
        Ok(DailyTrigger::new(self.fire_time()?, tz))
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file(DEFAULT_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("failed to load configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.site.tz()?;
        self.schedule.fire_time()?;
        if self.db.url.trim().is_empty() {
            anyhow::bail!("db.url must not be empty");
        }
        Ok(())
    }
}
