/// Core type definitions shared by the CTA strategy engine, order manager and backtester
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TradingError};
use crate::market::MarketTables;

/// Stop order lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopOrderStatus {
    #[default]
    Waiting,
    Cancelled,
    Triggered,
}

impl StopOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopOrderStatus::Waiting => "WAITING",
            StopOrderStatus::Cancelled => "CANCELLED",
            StopOrderStatus::Triggered => "TRIGGERED",
        }
    }

    /// Triggered and cancelled orders never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StopOrderStatus::Waiting)
    }
}

impl FromStr for StopOrderStatus {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "WAITING" => Ok(StopOrderStatus::Waiting),
            "CANCELLED" => Ok(StopOrderStatus::Cancelled),
            "TRIGGERED" => Ok(StopOrderStatus::Triggered),
            _ => Err(TradingError::unknown_variant("stop order status", s)),
        }
    }
}

impl fmt::Display for StopOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution context a strategy instance runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineType {
    #[default]
    Live,
    Backtesting,
}

impl EngineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineType::Live => "LIVE",
            EngineType::Backtesting => "BACKTESTING",
        }
    }
}

impl FromStr for EngineType {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "LIVE" => Ok(EngineType::Live),
            "BACKTESTING" => Ok(EngineType::Backtesting),
            _ => Err(TradingError::unknown_variant("engine type", s)),
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity of historical data replay
///
/// Serialized as "BAR"/"TICK"; deserializes from either those names or the codes 1/2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "BacktestingModeRepr")]
pub enum BacktestingMode {
    #[default]
    Bar = 1,
    Tick = 2,
}

impl BacktestingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BacktestingMode::Bar => "BAR",
            BacktestingMode::Tick => "TICK",
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for BacktestingMode {
    type Error = TradingError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(BacktestingMode::Bar),
            2 => Ok(BacktestingMode::Tick),
            other => Err(TradingError::unknown_variant(
                "backtesting mode",
                &other.to_string(),
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BacktestingModeRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<BacktestingModeRepr> for BacktestingMode {
    type Error = TradingError;

    fn try_from(repr: BacktestingModeRepr) -> Result<Self> {
        match repr {
            BacktestingModeRepr::Code(code) => BacktestingMode::try_from(code),
            BacktestingModeRepr::Name(name) => name.parse(),
        }
    }
}

impl FromStr for BacktestingMode {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "BAR" => Ok(BacktestingMode::Bar),
            "TICK" => Ok(BacktestingMode::Tick),
            _ => Err(TradingError::unknown_variant("backtesting mode", s)),
        }
    }
}

impl fmt::Display for BacktestingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kline area relative to the current directional bias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Area {
    LongA,
    LongB,
    LongC,
    LongD,
    LongE,
    ShortA,
    ShortB,
    ShortC,
    ShortD,
    ShortE,
}

impl Area {
    pub const ALL: [Area; 10] = [
        Area::LongA,
        Area::LongB,
        Area::LongC,
        Area::LongD,
        Area::LongE,
        Area::ShortA,
        Area::ShortB,
        Area::ShortC,
        Area::ShortD,
        Area::ShortE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Area::LongA => "LONG_A",
            Area::LongB => "LONG_B",
            Area::LongC => "LONG_C",
            Area::LongD => "LONG_D",
            Area::LongE => "LONG_E",
            Area::ShortA => "SHORT_A",
            Area::ShortB => "SHORT_B",
            Area::ShortC => "SHORT_C",
            Area::ShortD => "SHORT_D",
            Area::ShortE => "SHORT_E",
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(
            self,
            Area::LongA | Area::LongB | Area::LongC | Area::LongD | Area::LongE
        )
    }

    pub fn is_short(&self) -> bool {
        !self.is_long()
    }
}

impl FromStr for Area {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_uppercase();
        Area::ALL
            .iter()
            .copied()
            .find(|area| area.as_str() == upper)
            .ok_or_else(|| TradingError::unknown_variant("area", s))
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

impl FromStr for Direction {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            _ => Err(TradingError::unknown_variant("direction", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open/close flag for futures orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Offset {
    Open,
    Close,
    CloseToday,
    CloseYesterday,
}

impl Offset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Offset::Open => "OPEN",
            Offset::Close => "CLOSE",
            Offset::CloseToday => "CLOSE_TODAY",
            Offset::CloseYesterday => "CLOSE_YESTERDAY",
        }
    }

    pub fn is_close(&self) -> bool {
        !matches!(self, Offset::Open)
    }
}

impl FromStr for Offset {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "OPEN" => Ok(Offset::Open),
            "CLOSE" => Ok(Offset::Close),
            "CLOSE_TODAY" => Ok(Offset::CloseToday),
            "CLOSE_YESTERDAY" => Ok(Offset::CloseYesterday),
            _ => Err(TradingError::unknown_variant("offset", s)),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bar interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interval {
    Minute,
    Hour,
    Daily,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::Minute, Interval::Hour, Interval::Daily];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute => "MINUTE",
            Interval::Hour => "HOUR",
            Interval::Daily => "DAILY",
        }
    }
}

impl FromStr for Interval {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "MINUTE" => Ok(Interval::Minute),
            "HOUR" => Ok(Interval::Hour),
            "DAILY" => Ok(Interval::Daily),
            _ => Err(TradingError::unknown_variant("interval", s)),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the CTA module
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub engine_type: EngineType,

    #[serde(default)]
    pub backtesting_mode: BacktestingMode,

    // Tick table overrides; omitted tables keep the built-in data
    #[serde(default)]
    pub markets: MarketOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketOverrides {
    pub night_market_sq1: Option<BTreeMap<String, f64>>,
    pub night_market_sq2: Option<BTreeMap<String, f64>>,
    pub night_market_sq3: Option<BTreeMap<String, f64>>,
    pub night_market_zz: Option<BTreeMap<String, f64>>,
    pub night_market_dl: Option<BTreeMap<String, f64>>,
    pub market_zj: Option<BTreeMap<String, f64>>,
    pub market_day_only: Option<BTreeMap<String, f64>>,
}

impl MarketOverrides {
    pub fn is_empty(&self) -> bool {
        self.night_market_sq1.is_none()
            && self.night_market_sq2.is_none()
            && self.night_market_sq3.is_none()
            && self.night_market_zz.is_none()
            && self.night_market_dl.is_none()
            && self.market_zj.is_none()
            && self.market_day_only.is_none()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            engine_type: EngineType::default(),
            backtesting_mode: BacktestingMode::default(),
            markets: MarketOverrides::default(),
        }
    }
}

impl Config {
    /// Build validated tick tables, applying any configured overrides
    pub fn market_tables(&self) -> Result<MarketTables> {
        if self.markets.is_empty() {
            return Ok(MarketTables::builtin().clone());
        }
        MarketTables::from_overrides(&self.markets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_codes_roundtrip_through_from_str() {
        for area in Area::ALL {
            assert_eq!(area.as_str().parse::<Area>().unwrap(), area);
        }
        for interval in Interval::ALL {
            assert_eq!(interval.as_str().parse::<Interval>().unwrap(), interval);
        }
        assert_eq!("close_today".parse::<Offset>().unwrap(), Offset::CloseToday);
        assert_eq!("Backtesting".parse::<EngineType>().unwrap(), EngineType::Backtesting);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!("PENDING".parse::<StopOrderStatus>().is_err());
        assert!("PAPER".parse::<EngineType>().is_err());
        assert!("LONG_F".parse::<Area>().is_err());
        assert!("NET".parse::<Direction>().is_err());
        assert!("WEEKLY".parse::<Interval>().is_err());
        assert!("".parse::<Offset>().is_err());

        match "SECOND".parse::<BacktestingMode>() {
            Err(TradingError::UnknownVariant { kind, value }) => {
                assert_eq!(kind, "backtesting mode");
                assert_eq!(value, "SECOND");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_backtesting_mode_codes() {
        assert_eq!(BacktestingMode::Bar.as_u8(), 1);
        assert_eq!(BacktestingMode::Tick.as_u8(), 2);
        assert_eq!(BacktestingMode::try_from(2).unwrap(), BacktestingMode::Tick);
        assert!(BacktestingMode::try_from(0).is_err());
        assert!(BacktestingMode::try_from(3).is_err());
    }

    #[test]
    fn test_area_sides() {
        assert_eq!(Area::ALL.iter().filter(|a| a.is_long()).count(), 5);
        assert_eq!(Area::ALL.iter().filter(|a| a.is_short()).count(), 5);
        assert!(Area::ShortC.is_short());
    }

    #[test]
    fn test_stop_order_status_terminal() {
        assert!(!StopOrderStatus::Waiting.is_terminal());
        assert!(StopOrderStatus::Cancelled.is_terminal());
        assert!(StopOrderStatus::Triggered.is_terminal());
        assert_eq!(StopOrderStatus::default(), StopOrderStatus::Waiting);
    }

    #[test]
    fn test_serde_uses_same_codes() {
        let json = serde_json::to_string(&Area::ShortE).unwrap();
        assert_eq!(json, "\"SHORT_E\"");
        let offset: Offset = serde_json::from_str("\"CLOSE_YESTERDAY\"").unwrap();
        assert_eq!(offset, Offset::CloseYesterday);
        assert!(serde_json::from_str::<Direction>("\"NET\"").is_err());
    }

    #[test]
    fn test_backtesting_mode_deserializes_name_or_code() {
        let mode: BacktestingMode = serde_json::from_str("2").unwrap();
        assert_eq!(mode, BacktestingMode::Tick);
        let mode: BacktestingMode = serde_json::from_str("\"BAR\"").unwrap();
        assert_eq!(mode, BacktestingMode::Bar);
        assert_eq!(serde_json::to_string(&BacktestingMode::Tick).unwrap(), "\"TICK\"");

        assert!(serde_json::from_str::<BacktestingMode>("0").is_err());
        assert!(serde_json::from_str::<BacktestingMode>("\"MINUTE\"").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.engine_type, EngineType::Live);
        assert_eq!(config.backtesting_mode, BacktestingMode::Bar);
        assert!(config.markets.is_empty());
    }
}
