use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidMillis { name: &'static str, value: String },
    #[error("DASHBOARD_API_URL must start with http:// or https://, got {0:?}")]
    InvalidUrl(String),
}

/// Refresh period for each home panel. Zero means the panel fetches once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    pub spaces: Duration,
    pub stock: Duration,
    pub obsoletos: Duration,
    pub orders_per_hour: Duration,
    pub bank: Duration,
    pub orders: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            spaces: Duration::from_secs(10),
            stock: Duration::from_secs(15),
            obsoletos: Duration::ZERO,
            orders_per_hour: Duration::ZERO,
            bank: Duration::from_secs(60),
            orders: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL every request path is resolved against
    pub api_url: String,
    pub polling: PollingConfig,
    /// Applied to every request when set
    pub request_timeout: Option<Duration>,
    /// Fallback filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            polling: PollingConfig::default(),
            request_timeout: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read the configuration from the process environment.
    ///
    /// All variables are optional:
    /// - `DASHBOARD_API_URL`: backend base URL (default `http://localhost:8000`)
    /// - `DASHBOARD_POLL_{SPACES,STOCK,OBSOLETOS,ORDERS_PER_HOUR,BANK,ORDERS}_MS`:
    ///   per-panel refresh period, `0` to fetch once
    /// - `DASHBOARD_REQUEST_TIMEOUT_MS`: per-request timeout, `0` for none
    /// - `DASHBOARD_LOG`: log filter used when `RUST_LOG` is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let millis = |name: &'static str, default: Duration| {
            match lookup(name).map(|raw| raw.trim().to_string()) {
                None => Ok(default),
                Some(raw) if raw.is_empty() => Ok(default),
                Some(raw) => raw
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidMillis { name, value: raw }),
            }
        };

        let api_url = match lookup("DASHBOARD_API_URL") {
            Some(url) if !url.trim().is_empty() => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidUrl(url));
                }
                url
            }
            _ => defaults.api_url,
        };

        let polling = PollingConfig {
            spaces: millis("DASHBOARD_POLL_SPACES_MS", defaults.polling.spaces)?,
            stock: millis("DASHBOARD_POLL_STOCK_MS", defaults.polling.stock)?,
            obsoletos: millis(
                "DASHBOARD_POLL_OBSOLETOS_MS",
                defaults.polling.obsoletos,
            )?,
            orders_per_hour: millis(
                "DASHBOARD_POLL_ORDERS_PER_HOUR_MS",
                defaults.polling.orders_per_hour,
            )?,
            bank: millis("DASHBOARD_POLL_BANK_MS", defaults.polling.bank)?,
            orders: millis("DASHBOARD_POLL_ORDERS_MS", defaults.polling.orders)?,
        };

        let request_timeout =
            Some(millis("DASHBOARD_REQUEST_TIMEOUT_MS", Duration::ZERO)?)
                .filter(|timeout| !timeout.is_zero());

        let log_filter = lookup("DASHBOARD_LOG")
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            api_url,
            polling,
            request_timeout,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.polling.spaces, Duration::from_secs(10));
        assert_eq!(config.polling.orders, Duration::ZERO);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("DASHBOARD_API_URL", "https://factory.example.com/"),
            ("DASHBOARD_POLL_STOCK_MS", "2500"),
            ("DASHBOARD_POLL_BANK_MS", "0"),
            ("DASHBOARD_REQUEST_TIMEOUT_MS", "8000"),
            ("DASHBOARD_LOG", "dashboard=debug"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://factory.example.com");
        assert_eq!(config.polling.stock, Duration::from_millis(2500));
        assert_eq!(config.polling.bank, Duration::ZERO);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(8)));
        assert_eq!(config.log_filter, "dashboard=debug");
    }

    #[test]
    fn zero_timeout_means_none() {
        let config = DashboardConfig::from_lookup(lookup(&[(
            "DASHBOARD_REQUEST_TIMEOUT_MS",
            "0",
        )]))
        .unwrap();
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(
            DashboardConfig::from_lookup(lookup(&[(
                "DASHBOARD_POLL_SPACES_MS",
                "ten"
            )])),
            Err(ConfigError::InvalidMillis {
                name: "DASHBOARD_POLL_SPACES_MS",
                value: "ten".into()
            })
        );
        assert_eq!(
            DashboardConfig::from_lookup(lookup(&[(
                "DASHBOARD_API_URL",
                "localhost:8000"
            )])),
            Err(ConfigError::InvalidUrl("localhost:8000".into()))
        );
    }
}
