use std::env;
use std::time::Duration;

/// Snapshots the sender can buffer before the sampler starts dropping new
/// ones (five minutes of backlog at the default 1s cadence).
pub const QUEUE_CAPACITY: usize = 300;

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_API_KEY: &str = "reformmed-secret-key";
const DEFAULT_IDENTITY: &str = "unknown";
const DEFAULT_INTERVAL_SECS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub server_url: String,
    pub api_key: String,
    pub system_name: String,
    pub location: String,
    pub interval: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            system_name: DEFAULT_IDENTITY.to_string(),
            location: DEFAULT_IDENTITY.to_string(),
            interval: Duration::from_secs_f64(DEFAULT_INTERVAL_SECS),
        }
    }
}

impl AgentConfig {
    /// Reads the `REFORMMED_*` environment, falling back to defaults for
    /// unset or malformed values.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AgentConfig::default();
        let interval = lookup("REFORMMED_INTERVAL")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|secs| *secs > 0.0 && secs.is_finite())
            .map(Duration::from_secs_f64)
            .unwrap_or(defaults.interval);

        AgentConfig {
            server_url: lookup("REFORMMED_SERVER_URL").unwrap_or(defaults.server_url),
            api_key: lookup("REFORMMED_API_KEY").unwrap_or(defaults.api_key),
            system_name: lookup("REFORMMED_SYSTEM_NAME").unwrap_or(defaults.system_name),
            location: lookup("REFORMMED_LOCATION").unwrap_or(defaults.location),
            interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AgentConfig::from_lookup(|_| None);
        assert_eq!(config.server_url, "http://localhost:8000");
        assert_eq!(config.api_key, "reformmed-secret-key");
        assert_eq!(config.system_name, "unknown");
        assert_eq!(config.location, "unknown");
        assert_eq!(config.interval, Duration::from_secs(1));
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = AgentConfig::from_lookup(lookup_from(&[
            ("REFORMMED_SERVER_URL", "https://collector.example:9000"),
            ("REFORMMED_API_KEY", "k"),
            ("REFORMMED_SYSTEM_NAME", "lab-7"),
            ("REFORMMED_LOCATION", "basement"),
            ("REFORMMED_INTERVAL", "2.5"),
        ]));
        assert_eq!(config.server_url, "https://collector.example:9000");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.system_name, "lab-7");
        assert_eq!(config.location, "basement");
        assert_eq!(config.interval, Duration::from_secs_f64(2.5));
    }

    #[test]
    fn malformed_interval_falls_back_to_default() {
        for bad in ["abc", "", "-1", "0", "inf", "nan"] {
            let config = AgentConfig::from_lookup(lookup_from(&[("REFORMMED_INTERVAL", bad)]));
            assert_eq!(config.interval, Duration::from_secs(1), "input: {bad:?}");
        }
    }
}
