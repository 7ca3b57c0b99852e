use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct SummitConfig {
    pub data: DataConfig,
    pub booking: BookingRules,
    pub credits: CreditRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Directory holding the per-store snapshot files.
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    /// How far ahead of a slot's start a member may still cancel.
    #[serde(default = "default_notice_hours")]
    pub cancellation_notice_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CreditRules {
    /// Newest entries kept in the credit-transaction snapshot; the running
    /// balance is unaffected by pruning.
    #[serde(default = "default_log_retention")]
    pub log_retention: usize,
}

fn default_notice_hours() -> i64 {
    24
}

fn default_log_retention() -> usize {
    500
}

impl Default for SummitConfig {
    fn default() -> Self {
        Self {
            data: DataConfig { dir: "data".into() },
            booking: BookingRules {
                cancellation_notice_hours: default_notice_hours(),
            },
            credits: CreditRules {
                log_retention: default_log_retention(),
            },
        }
    }
}

impl SummitConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("data.dir", "data")?
            .set_default("booking.cancellation_notice_hours", 24_i64)?
            .set_default("credits.log_retention", 500_i64)?
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Add in the current environment file
            // Default to 'development' env
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of SUMMIT)
            // Eg.. `SUMMIT__DATA__DIR=/var/lib/summit` would set the data dir
            .add_source(config::Environment::with_prefix("SUMMIT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SummitConfig::default();
        assert_eq!(config.booking.cancellation_notice_hours, 24);
        assert_eq!(config.credits.log_retention, 500);
        assert_eq!(config.data.dir, "data");
    }
}
