// Error reporting with Sentry integration
use tracing::info;

use crate::common::AppConfig;

/// Sentry settings; reporting stays off without a DSN.
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    pub sentry_dsn: Option<String>,
    pub environment: String,
    pub sample_rate: f32,
}

impl MonitoringConfig {
    pub fn new(sentry_dsn: Option<String>, environment: impl Into<String>) -> Self {
        Self {
            sentry_dsn,
            environment: environment.into(),
            sample_rate: 1.0,
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.sentry_dsn.clone(), config.sentry_environment.clone())
    }
}

/// Initialize the Sentry client. The returned guard flushes pending events
/// when dropped, so `main` keeps it alive for the life of the process.
pub fn init_sentry(config: &MonitoringConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.clone().into()),
            sample_rate: config.sample_rate,
            ..Default::default()
        },
    ));

    if guard.is_enabled() {
        info!(environment = %config.environment, "Sentry error tracking enabled");
        Some(guard)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_no_dsn_disables_sentry() {
        let config = MonitoringConfig::new(None, "production");
        assert!(init_sentry(&config).is_none());

        let config = MonitoringConfig::new(Some(String::new()), "production");
        assert!(init_sentry(&config).is_none());
    }

    #[test]
    fn test_settings_come_from_app_config() {
        let vars = HashMap::from([("SENTRY_ENVIRONMENT", "staging")]);
        let config = MonitoringConfig::from_app_config(&AppConfig::from_map(&vars));

        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.environment, "staging");
        assert!(init_sentry(&config).is_none());
    }
}
