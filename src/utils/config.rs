use std::env;

use crate::models::catalog::SizeMultipliers;

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: Option<String>,
    pub size_multipliers: SizeMultipliers,
    pub currency_symbol: String,
    pub log_level: String,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            size_multipliers: SizeMultipliers::default(),
            currency_symbol: "₽".to_string(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let defaults = SizeMultipliers::default();
        let config = Config {
            catalog_path: env::var("CATALOG_PATH").ok().filter(|p| !p.trim().is_empty()),
            size_multipliers: SizeMultipliers {
                small: multiplier_var("SIZE_MULTIPLIER_SMALL", defaults.small)?,
                medium: multiplier_var("SIZE_MULTIPLIER_MEDIUM", defaults.medium)?,
                large: multiplier_var("SIZE_MULTIPLIER_LARGE", defaults.large)?,
            },
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or("₽".to_string()),
            log_level: Self::log_level_from_env(),
            environment: env::var("APP_ENV").unwrap_or("development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Log level is needed before the rest of the config is loaded.
    pub fn log_level_from_env() -> String {
        dotenv::dotenv().ok();
        env::var("LOG_LEVEL").unwrap_or("info".to_string())
    }

    /// Filter directive for the subscriber: `--verbose`, then `RUST_LOG`, then `LOG_LEVEL`.
    pub fn log_directive(verbose: bool) -> String {
        if verbose {
            return "debug".to_string();
        }
        match env::var("RUST_LOG") {
            Ok(directive) if !directive.trim().is_empty() => directive,
            _ => Self::log_level_from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let m = &self.size_multipliers;
        SizeMultipliers::new(m.small, m.medium, m.large)?;

        if self.currency_symbol.trim().is_empty() {
            return Err(anyhow::anyhow!("CURRENCY_SYMBOL must not be empty"));
        }

        if let Some(path) = &self.catalog_path {
            if !path.ends_with(".json") {
                return Err(anyhow::anyhow!("CATALOG_PATH must point to a .json file"));
            }
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn multiplier_var(key: &str, default: f64) -> anyhow::Result<f64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow::anyhow!("{} must be a number, got '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}
