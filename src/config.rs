use crate::domain::{DomainError, TimestampUnit};
use std::path::PathBuf;

pub const DEFAULT_PAGE_SIZE: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub index_path: PathBuf,
    pub port: u16,
    pub timestamp_unit: TimestampUnit,
    pub page_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let index_path = PathBuf::from(get("MEDIA_INDEX_PATH").unwrap_or_else(|| "media.db".to_string()));

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| DomainError::Io(format!("Invalid PORT '{}': {}", raw, e)))?,
            None => 3000,
        };

        let timestamp_unit = match get("MEDIA_TIMESTAMP_UNIT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| DomainError::Io(format!("Invalid MEDIA_TIMESTAMP_UNIT: {}", e)))?,
            None => TimestampUnit::Seconds,
        };

        let page_size = match get("MEDIA_PAGE_SIZE") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(DomainError::Io(format!("Invalid MEDIA_PAGE_SIZE '{}'", raw))),
            },
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            index_path,
            port,
            timestamp_unit,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, DomainError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.index_path, PathBuf::from("media.db"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.timestamp_unit, TimestampUnit::Seconds);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("MEDIA_INDEX_PATH", "/data/external.db"),
            ("PORT", "8080"),
            ("MEDIA_TIMESTAMP_UNIT", "millis"),
            ("MEDIA_PAGE_SIZE", "25"),
        ])
        .unwrap();

        assert_eq!(config.index_path, PathBuf::from("/data/external.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.timestamp_unit, TimestampUnit::Millis);
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("PORT", "  "), ("MEDIA_INDEX_PATH", "")]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.index_path, PathBuf::from("media.db"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("MEDIA_TIMESTAMP_UNIT", "fortnights")]).is_err());
        assert!(config(&[("MEDIA_PAGE_SIZE", "0")]).is_err());
    }
}
