use std::{env, path::PathBuf};

use crate::{
    errors::{AppError, AppResult},
    services::pagination::PageSize,
};

#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub page_size: usize,
    pub tick_millis: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("QUIZ_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("questions")),
            page_size: env::var("QUIZ_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            tick_millis: env::var("QUIZ_TICK_MILLIS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(1000),
        }
    }

    /// Rejects settings the quiz runtime cannot honour.
    pub fn validate(&self) -> AppResult<()> {
        PageSize::try_from(self.page_size)?;

        if self.tick_millis == 0 {
            return Err(AppError::InvalidParameter(
                "QUIZ_TICK_MILLIS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            data_dir: PathBuf::from("questions-test"),
            page_size: 10,
            tick_millis: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(!config.data_dir.as_os_str().is_empty());
        assert!(config.tick_millis > 0 || env::var("QUIZ_TICK_MILLIS").is_ok());
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.data_dir, PathBuf::from("questions-test"));
        assert_eq!(config.page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_page_size_is_rejected() {
        let config = Config {
            page_size: 7,
            ..Config::test_config()
        };

        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        let config = Config {
            tick_millis: 0,
            ..Config::test_config()
        };

        assert!(config.validate().is_err());
    }
}
