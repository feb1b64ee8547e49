/// Tick size tables keyed by underlying code, one table per exchange session pattern
use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::{debug, info, warn};

use crate::error::{Result, TradingError};
use crate::time::MarketSession;
use crate::types::MarketOverrides;

// SHFE night session 21:00 ~ 02:30
pub const NIGHT_MARKET_SQ1: &[(&str, f64)] = &[("AU", 0.05), ("AG", 1.0), ("SC", 0.1)];

// SHFE night session 21:00 ~ 01:00
pub const NIGHT_MARKET_SQ2: &[(&str, f64)] = &[
    ("CU", 10.0),
    ("PB", 5.0),
    ("AL", 5.0),
    ("ZN", 5.0),
    ("WR", 1.0),
    ("NI", 10.0),
];

// SHFE night session 21:00 ~ 23:00
pub const NIGHT_MARKET_SQ3: &[(&str, f64)] = &[
    ("RU", 5.0),
    ("RB", 1.0),
    ("HC", 1.0),
    ("SP", 2.0),
    ("FU", 1.0),
    ("BU", 2.0),
    ("NR", 5.0),
    ("C", 1.0),
    ("CS", 1.0),
];

// CZCE night session 21:00 ~ 23:00
pub const NIGHT_MARKET_ZZ: &[(&str, f64)] = &[
    ("TA", 2.0),
    ("JR", 1.0),
    ("OI", 0.0),
    ("RO", 1.0),
    ("PM", 1.0),
    ("WH", 1.0),
    ("CF", 5.0),
    ("SR", 0.0),
    ("FG", 1.0),
    ("MA", 1.0),
    ("RS", 1.0),
    ("RM", 1.0),
    ("RI", 1.0),
    ("ZC", 0.2),
];

// DCE night session 21:00 ~ 23:00
pub const NIGHT_MARKET_DL: &[(&str, f64)] = &[
    ("V", 5.0),
    ("L", 5.0),
    ("BB", 0.05),
    ("I", 0.5),
    ("FB", 0.05),
    ("C", 1.0),
    ("PP", 1.0),
    ("A", 1.0),
    ("B", 1.0),
    ("M", 1.0),
    ("Y", 2.0),
    ("P", 2.0),
    ("JM", 0.5),
    ("J", 0.5),
    ("EG", 1.0),
];

// CFFEX, day session only 9:15 ~ 11:30, 13:00 ~ 15:15
pub const MARKET_ZJ: &[(&str, f64)] = &[
    ("IC", 0.2),
    ("IF", 0.2),
    ("IH", 0.2),
    ("T", 0.005),
    ("TF", 0.005),
    ("TS", 0.005),
];

// Underlyings without a night session
pub const MARKET_DAY_ONLY: &[(&str, f64)] = &[
    ("IC", 0.2),
    ("IF", 0.2),
    ("IH", 0.2),
    ("T", 0.005),
    ("TF", 0.005),
    ("TS", 0.005),
    ("JD", 1.0),
    ("BB", 0.05),
    ("CS", 1.0),
    ("FB", 0.05),
    ("L", 5.0),
    ("V", 5.0),
    ("JR", 1.0),
    ("LR", 1.0),
    ("PM", 1.0),
    ("RI", 1.0),
    ("RS", 1.0),
    ("SM", 2.0),
    ("WH", 1.0),
    ("AP", 1.0),
    ("CJ", 1.0),
    ("UR", 1.0),
];

/// Tables whose night session closes at 23:00, in merge order (later wins)
pub const NIGHT_MARKET_23_SOURCES: [MarketSession; 3] = [
    MarketSession::NightDl,
    MarketSession::NightZz,
    MarketSession::NightSq3,
];

pub const NIGHT_MARKET_23_NAME: &str = "NIGHT_MARKET_23";

/// Built-in entries for a session table
pub fn builtin_entries(session: MarketSession) -> &'static [(&'static str, f64)] {
    match session {
        MarketSession::NightSq1 => NIGHT_MARKET_SQ1,
        MarketSession::NightSq2 => NIGHT_MARKET_SQ2,
        MarketSession::NightSq3 => NIGHT_MARKET_SQ3,
        MarketSession::NightZz => NIGHT_MARKET_ZZ,
        MarketSession::NightDl => NIGHT_MARKET_DL,
        MarketSession::Zj => MARKET_ZJ,
        MarketSession::DayOnly => MARKET_DAY_ONLY,
    }
}

/// Read-only mapping from underlying code to minimum price increment
#[derive(Debug, Clone, PartialEq)]
pub struct TickTable {
    name: String,
    entries: BTreeMap<String, f64>,
}

impl TickTable {
    /// Build a table, validating every entry
    ///
    /// Codes must be non-empty ASCII letters and are stored upper-case. Tick sizes
    /// must be finite and non-negative. A code listed twice (in any case) is rejected.
    pub fn from_entries<I, K>(name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut map = BTreeMap::new();

        for (code, tick) in entries {
            let code = normalize_code(name, code.as_ref())?;
            validate_tick(name, &code, tick)?;

            if tick == 0.0 {
                warn!("{}: tick size for {} is 0", name, code);
            }

            if map.insert(code.clone(), tick).is_some() {
                return Err(TradingError::ConfigError(format!(
                    "{}: duplicate underlying {}",
                    name, code
                )));
            }
        }

        debug!("Tick table {} loaded with {} underlyings", name, map.len());

        Ok(TickTable {
            name: name.to_string(),
            entries: map,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tick size for an underlying code (case-insensitive)
    pub fn get(&self, underlying: &str) -> Option<f64> {
        self.entries.get(&underlying.to_uppercase()).copied()
    }

    pub fn contains(&self, underlying: &str) -> bool {
        self.entries.contains_key(&underlying.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(code, tick)| (code.as_str(), *tick))
    }
}

fn normalize_code(table: &str, code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TradingError::ConfigError(format!(
            "{}: invalid underlying code {:?}",
            table, code
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}

fn validate_tick(table: &str, code: &str, tick: f64) -> Result<()> {
    if !tick.is_finite() || tick < 0.0 {
        return Err(TradingError::ConfigError(format!(
            "{}: tick size for {} must be a non-negative number, got {}",
            table, code, tick
        )));
    }
    Ok(())
}

/// Merge tables in order; on a shared code the table listed last wins
pub fn merge_tables(name: &str, tables: &[&TickTable]) -> TickTable {
    let mut entries = BTreeMap::new();
    for table in tables {
        for (code, tick) in table.iter() {
            entries.insert(code.to_string(), tick);
        }
    }

    TickTable {
        name: name.to_string(),
        entries,
    }
}

/// All session tables plus the derived 23:00-close table
#[derive(Debug, Clone)]
pub struct MarketTables {
    tables: BTreeMap<MarketSession, TickTable>,
    night_market_23: TickTable,
}

static BUILTIN: OnceLock<MarketTables> = OnceLock::new();

impl MarketTables {
    /// Shared built-in tables, built on first use
    pub fn builtin() -> &'static MarketTables {
        BUILTIN.get_or_init(|| {
            MarketTables::from_overrides(&MarketOverrides::default())
                .expect("built-in tick tables are valid")
        })
    }

    /// Built-in tables with any configured table replaced wholesale
    pub fn from_overrides(overrides: &MarketOverrides) -> Result<Self> {
        let mut tables = BTreeMap::new();

        for session in MarketSession::ALL {
            let name = session.table_name();
            let table = match override_for(overrides, session) {
                Some(entries) => {
                    info!("Using configured tick table {} ({} entries)", name, entries.len());
                    TickTable::from_entries(name, entries.iter().map(|(k, v)| (k.as_str(), *v)))?
                }
                None => TickTable::from_entries(name, builtin_entries(session).iter().copied())?,
            };
            tables.insert(session, table);
        }

        let sources: Vec<&TickTable> = NIGHT_MARKET_23_SOURCES
            .iter()
            .filter_map(|session| tables.get(session))
            .collect();
        let night_market_23 = merge_tables(NIGHT_MARKET_23_NAME, &sources);

        Ok(MarketTables {
            tables,
            night_market_23,
        })
    }

    pub fn table(&self, session: MarketSession) -> &TickTable {
        // every session is inserted by from_overrides
        &self.tables[&session]
    }

    pub fn night_market_23(&self) -> &TickTable {
        &self.night_market_23
    }

    /// Session table an underlying belongs to, searched in `MarketSession::ALL` order
    pub fn session_of(&self, underlying: &str) -> Option<MarketSession> {
        MarketSession::ALL
            .into_iter()
            .find(|session| self.table(*session).contains(underlying))
    }

    /// Tick size of an underlying, from the table `session_of` resolves to
    pub fn price_tick(&self, underlying: &str) -> Option<f64> {
        self.session_of(underlying)
            .and_then(|session| self.table(session).get(underlying))
    }

    /// True when the underlying's night session closes at 23:00
    pub fn closes_at_23(&self, underlying: &str) -> bool {
        self.night_market_23.contains(underlying)
    }
}

fn override_for(
    overrides: &MarketOverrides,
    session: MarketSession,
) -> Option<&BTreeMap<String, f64>> {
    match session {
        MarketSession::NightSq1 => overrides.night_market_sq1.as_ref(),
        MarketSession::NightSq2 => overrides.night_market_sq2.as_ref(),
        MarketSession::NightSq3 => overrides.night_market_sq3.as_ref(),
        MarketSession::NightZz => overrides.night_market_zz.as_ref(),
        MarketSession::NightDl => overrides.night_market_dl.as_ref(),
        MarketSession::Zj => overrides.market_zj.as_ref(),
        MarketSession::DayOnly => overrides.market_day_only.as_ref(),
    }
}
