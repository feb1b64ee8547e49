/// Configuration loading from TOML file
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, TradingError};
use crate::market::MarketTables;
use crate::types::Config;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    load_config_with_tables(path).map(|(config, _)| config)
}

/// Load configuration along with the tick tables it validated
pub fn load_config_with_tables<P: AsRef<Path>>(path: P) -> Result<(Config, MarketTables)> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let loaded = parse_and_validate(&content)?;
    info!("Configuration loaded from {}", path.display());
    Ok(loaded)
}

/// Parse and validate configuration text
pub fn load_config_str(content: &str) -> Result<Config> {
    parse_and_validate(content).map(|(config, _)| config)
}

fn parse_and_validate(content: &str) -> Result<(Config, MarketTables)> {
    let config: Config = toml::from_str(content)
        .map_err(|e| TradingError::ConfigError(format!("Failed to parse config: {}", e)))?;

    // Validate config
    let tables = validate_config(&config)?;

    Ok((config, tables))
}

fn validate_config(config: &Config) -> Result<MarketTables> {
    if config.log_level.trim().is_empty() {
        return Err(TradingError::ConfigError("log_level is empty".to_string()));
    }

    // Bad tick entries fail at load time
    let tables = config.market_tables()?;
    debug!(
        "Validated tick tables: {} underlyings close at 23:00",
        tables.night_market_23().len()
    );

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::MarketSession;
    use crate::types::{BacktestingMode, EngineType};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.engine_type, EngineType::Live);
        assert_eq!(config.backtesting_mode, BacktestingMode::Bar);
        assert!(config.markets.is_empty());
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            log_level = "debug"
            engine_type = "BACKTESTING"
            backtesting_mode = "TICK"

            [markets.night_market_sq1]
            AU = 0.02
            AG = 1

            [markets.market_day_only]
            jd = 1
        "#;

        let config = load_config_str(text).unwrap();
        assert_eq!(config.engine_type, EngineType::Backtesting);
        assert_eq!(config.backtesting_mode, BacktestingMode::Tick);

        let tables = config.market_tables().unwrap();
        let sq1 = tables.table(MarketSession::NightSq1);
        assert_eq!(sq1.get("AU"), Some(0.02));
        assert!(!sq1.contains("SC"));
        assert_eq!(tables.table(MarketSession::DayOnly).len(), 1);
        assert_eq!(tables.price_tick("RB"), Some(1.0));
    }

    #[test]
    fn test_invalid_enum_value_fails() {
        let err = load_config_str("engine_type = \"PAPER\"").unwrap_err();
        assert!(err.is_config_error());

        assert!(load_config_str("backtesting_mode = 3").is_err());
        assert!(load_config_str("backtesting_mode = -1").is_err());
    }

    #[test]
    fn test_backtesting_mode_accepts_numeric_code() {
        let config = load_config_str("backtesting_mode = 2").unwrap();
        assert_eq!(config.backtesting_mode, BacktestingMode::Tick);

        let config = load_config_str("backtesting_mode = 1").unwrap();
        assert_eq!(config.backtesting_mode, BacktestingMode::Bar);
    }

    #[test]
    fn test_invalid_tick_fails() {
        let text = "[markets.night_market_dl]\nM = -1\n";
        let err = load_config_str(text).unwrap_err();
        assert_eq!(err.error_code(), "CFG_001");
        assert!(err.to_string().contains("NIGHT_MARKET_DL"));

        assert!(load_config_str("[markets.night_market_dl]\nM = nan\n").is_err());
        assert!(load_config_str("[markets.night_market_dl]\nM = \"1\"\n").is_err());
    }

    #[test]
    fn test_unknown_keys_fail() {
        assert!(load_config_str("log_levle = \"info\"").is_err());
        assert!(load_config_str("[markets.night_market_23]\nRB = 1\n").is_err());
    }

    #[test]
    fn test_load_config_file() {
        let path = std::env::temp_dir().join(format!("ctabase_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.log_level, "warn");

        // Cleanup
        let _ = std::fs::remove_file(&path);

        let err = load_config(&path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_001");
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_load_config_with_tables_applies_overrides() {
        let path = std::env::temp_dir().join(format!("ctabase_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[markets.night_market_sq3]\nRB = 2\nC = 3\n").unwrap();

        let (config, tables) = load_config_with_tables(&path).unwrap();
        assert!(config.markets.night_market_sq3.is_some());
        assert_eq!(tables.price_tick("RB"), Some(2.0));
        assert_eq!(tables.night_market_23().get("C"), Some(3.0));

        // Cleanup
        let _ = std::fs::remove_file(&path);
    }
}
