//! Dashboard configuration

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::DataError;

/// Minimum number of complaints a company needs to be loaded
pub const DEFAULT_COMPANY_THRESHOLD: u32 = 10_000;

/// How long a loaded table stays valid
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Number of companies offered in the company filter
pub const DEFAULT_TOP_COMPANIES: usize = 50;

/// Configuration for loading and presenting the complaints table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Path to the database file
    pub db_path: PathBuf,

    /// Complaints table, optionally schema-qualified
    pub table_name: String,

    /// Companies with fewer complaints are not loaded
    pub company_threshold: u32,

    /// Cache time-to-live, written as a humantime string ("1h", "90s")
    #[serde(with = "humantime_duration")]
    pub cache_ttl: Duration,

    /// Companies offered in the company filter
    pub top_companies: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("database/cfpb_complaints.db"),
            table_name: "cfpb_complaints".to_string(),
            company_threshold: DEFAULT_COMPANY_THRESHOLD,
            cache_ttl: DEFAULT_CACHE_TTL,
            top_companies: DEFAULT_TOP_COMPANIES,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON configuration file; missing keys take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the rest of the system relies on
    pub fn validate(&self) -> Result<(), DataError> {
        if self.table_name.trim().is_empty() {
            return Err(DataError::Config("table_name must not be empty".to_string()));
        }
        if self.cache_ttl.is_zero() {
            return Err(DataError::Config("cache_ttl must be positive".to_string()));
        }
        if self.top_companies == 0 {
            return Err(DataError::Config("top_companies must be at least 1".to_string()));
        }
        Ok(())
    }
}

mod humantime_duration {
    use std::time::Duration;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(D::Error::custom)
    }
}
