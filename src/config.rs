use anyhow::Context;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DATABASE_NAME_VAR: &str = "DATABASE_NAME";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Unset means the service runs without storage; data endpoints answer 500.
    pub database_url: Option<String>,
    pub database_name: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: non_empty(DATABASE_URL_VAR),
            database_name: non_empty(DATABASE_NAME_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(config.database_url.is_none());
        assert!(config.database_name.is_none());
    }

    #[test]
    fn reads_database_settings() {
        let config = config_from(&[
            ("PORT", "9100"),
            ("DATABASE_URL", "postgres://localhost/store"),
            ("DATABASE_NAME", "store"),
        ])
        .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/store"));
        assert_eq!(config.database_name.as_deref(), Some("store"));
    }

    #[test]
    fn blank_database_url_counts_as_unset() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
    }
}
